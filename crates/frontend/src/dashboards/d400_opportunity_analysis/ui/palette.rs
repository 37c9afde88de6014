/// Fixed colors for the known lines of business, so the pie and the bars agree
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Homeowners" => "#4e79a7",
        "Personal Auto" => "#f28e2b",
        "Boat" => "#76b7b2",
        "Umbrella" => "#e15759",
        "Inland Marine" => "#59a14f",
        "Commercial" => "#edc948",
        "Other" => "#bab0ac",
        other => FALLBACK[fallback_index(other)],
    }
}

const FALLBACK: [&str; 4] = ["#b07aa1", "#ff9da7", "#9c755f", "#86bcb6"];

fn fallback_index(category: &str) -> usize {
    category.bytes().map(usize::from).sum::<usize>() % FALLBACK.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_configured_categories() {
        assert_eq!(category_color("Boat"), "#76b7b2");
        let custom = category_color("Pets");
        assert_eq!(custom, category_color("Pets"));
        assert!(FALLBACK.contains(&custom));
    }
}
