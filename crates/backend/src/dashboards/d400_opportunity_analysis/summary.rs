use contracts::dashboards::d400_opportunity_analysis::{
    LobCategoryTotal, LobReportRow, ProducerCategoryTotal, ProducerReportRow,
};
use std::collections::BTreeMap;

/// Totals by line of business (pie chart), sorted by category
pub fn summarize_lob(rows: &[LobReportRow]) -> Vec<LobCategoryTotal> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.lob_category.as_str()).or_insert(0) += row.count;
    }
    totals
        .into_iter()
        .map(|(category, count)| LobCategoryTotal {
            lob_category: category.to_string(),
            count,
        })
        .collect()
}

/// Totals by producer and line of business (grouped bar chart)
pub fn summarize_producers(rows: &[ProducerReportRow]) -> Vec<ProducerCategoryTotal> {
    let mut totals: BTreeMap<(&str, &str), i64> = BTreeMap::new();
    for row in rows {
        *totals
            .entry((row.producer.as_str(), row.lob_category.as_str()))
            .or_insert(0) += row.count;
    }
    totals
        .into_iter()
        .map(|((producer, category), count)| ProducerCategoryTotal {
            producer: producer.to_string(),
            lob_category: category.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lob(raw: &str, category: &str, count: i64) -> LobReportRow {
        LobReportRow {
            opportunity_type: Some(raw.to_string()),
            lob_category: category.to_string(),
            count,
        }
    }

    fn producer(name: &str, category: &str, count: i64) -> ProducerReportRow {
        ProducerReportRow {
            producer: name.to_string(),
            opportunity_type: None,
            lob_category: category.to_string(),
            count,
        }
    }

    #[test]
    fn test_lob_totals_conserve_counts() {
        let rows = vec![
            lob("Yacht", "Boat", 3),
            lob("Homeowners", "Homeowners", 5),
            lob("Watercraft", "Boat", 2),
            lob("Pet", "Other", 1),
        ];
        let totals = summarize_lob(&rows);
        assert_eq!(
            totals,
            vec![
                LobCategoryTotal { lob_category: "Boat".to_string(), count: 5 },
                LobCategoryTotal { lob_category: "Homeowners".to_string(), count: 5 },
                LobCategoryTotal { lob_category: "Other".to_string(), count: 1 },
            ]
        );
        let raw_total: i64 = rows.iter().map(|r| r.count).sum();
        let summary_total: i64 = totals.iter().map(|t| t.count).sum();
        assert_eq!(raw_total, summary_total);
    }

    #[test]
    fn test_producer_totals_merge_same_person() {
        let rows = vec![
            producer("Jane Doe", "Boat", 3),
            producer("Alex Kim", "Umbrella", 1),
            producer("Jane Doe", "Boat", 2),
            producer("Jane Doe", "Commercial", 4),
        ];
        let totals = summarize_producers(&rows);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].producer, "Alex Kim");
        assert_eq!(
            (totals[1].producer.as_str(), totals[1].lob_category.as_str(), totals[1].count),
            ("Jane Doe", "Boat", 5)
        );
        assert_eq!(totals[2].lob_category, "Commercial");
    }

    #[test]
    fn test_empty() {
        assert!(summarize_lob(&[]).is_empty());
        assert!(summarize_producers(&[]).is_empty());
    }
}
