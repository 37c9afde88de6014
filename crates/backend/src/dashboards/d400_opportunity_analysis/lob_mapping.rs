use contracts::dashboards::d400_opportunity_analysis::DEFAULT_LOB_CATEGORY;
use maplit::{convert_args, hashmap};
use std::collections::HashMap;

use crate::shared::config::ReportConfig;

/// Rules from Opportunity.Type picklist values to lines of business
///
/// Lookup is exact and case-sensitive; anything else gets the default category.
#[derive(Debug, Clone)]
pub struct LobMapping {
    rules: HashMap<String, String>,
    default_category: String,
}

impl LobMapping {
    pub fn new(rules: HashMap<String, String>, default_category: impl Into<String>) -> Self {
        Self {
            rules,
            default_category: default_category.into(),
        }
    }

    /// Built-in rules plus `[report.lob_overrides]`, with the configured default
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut mapping = Self::default();
        mapping.default_category = config.default_category.clone();
        mapping.rules.extend(
            config
                .lob_overrides
                .iter()
                .map(|(raw, category)| (raw.clone(), category.clone())),
        );
        mapping
    }

    pub fn map(&self, raw_type: &str) -> &str {
        self.rules
            .get(raw_type)
            .map(String::as_str)
            .unwrap_or(&self.default_category)
    }

    /// Empty Opportunity.Type maps to the default category
    pub fn map_optional(&self, raw_type: Option<&str>) -> &str {
        match raw_type {
            Some(raw) => self.map(raw),
            None => &self.default_category,
        }
    }

    pub fn is_known(&self, raw_type: &str) -> bool {
        self.rules.contains_key(raw_type)
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for LobMapping {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_LOB_CATEGORY)
    }
}

fn default_rules() -> HashMap<String, String> {
    convert_args!(hashmap!(
        // Homeowners
        "Homeowners" => "Homeowners",
        "Dwelling Fire - PL" => "Homeowners",
        "Mobile Homeowners" => "Homeowners",
        "Wind Only - PL" => "Homeowners",
        // Personal auto
        "Personal Auto" => "Personal Auto",
        "Motorcycle/ATV" => "Personal Auto",
        "Motorhome" => "Personal Auto",
        "Recreational Vehicle" => "Personal Auto",
        "Travel Trailer" => "Personal Auto",
        "Golf Cart" => "Personal Auto",
        // Boat
        "Watercraft" => "Boat",
        "Charter Watercraft" => "Boat",
        "Yacht" => "Boat",
        "Burnboat" => "Boat",
        "Boat" => "Boat",
        // Umbrella
        "Umbrella" => "Umbrella",
        "Commercial Umbrella" => "Umbrella",
        // Inland marine
        "Inland Marine - PL" => "Inland Marine",
        "Inland Marine - CL" => "Inland Marine",
        // Commercial
        "Commercial Package" => "Commercial",
        "Builders Risk/Installation - PL" => "Commercial",
        "Builders Risk/Installation - CL" => "Commercial",
        "Business Owners" => "Commercial",
        "Commercial Auto" => "Commercial",
        "Commercial Property" => "Commercial",
        "Directors & Officers" => "Commercial",
        "Employment Practice Liability" => "Commercial",
        "Errors & Omissions" => "Commercial",
        "General Liability" => "Commercial",
        "Liquor Liability" => "Commercial",
        "Marine Package" => "Commercial",
        "Wind Only - CL" => "Commercial",
        // Known values that are deliberately "Other"
        "Flood - PL" => "Other",
        "Personal Liability" => "Other",
        "Life" => "Other",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        let mapping = LobMapping::default();
        assert_eq!(mapping.map("Homeowners"), "Homeowners");
        assert_eq!(mapping.map("Yacht"), "Boat");
        assert_eq!(mapping.map("Golf Cart"), "Personal Auto");
        assert_eq!(mapping.map("Directors & Officers"), "Commercial");
        assert_eq!(mapping.map("Inland Marine - CL"), "Inland Marine");
        assert_eq!(mapping.map("Life"), "Other");
        assert_eq!(mapping.len(), 35);
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let mapping = LobMapping::default();
        assert_eq!(mapping.map("unknown-xyz"), "Other");
        assert_eq!(mapping.map(""), "Other");
        assert_eq!(mapping.map_optional(None), "Other");
        assert!(!mapping.is_known("unknown-xyz"));
        assert!(mapping.is_known("Life"));
    }

    #[test]
    fn test_exact_case_sensitive_match() {
        let mapping = LobMapping::default();
        assert_eq!(mapping.map("yacht"), "Other");
        assert_eq!(mapping.map("Yacht "), "Other");
        assert_eq!(mapping.map("HOMEOWNERS"), "Other");
    }

    #[test]
    fn test_config_overrides() {
        let config = ReportConfig {
            default_days: 30,
            default_category: "Unclassified".to_string(),
            lob_overrides: convert_args!(hashmap!(
                "Yacht" => "Marine",
                "Pet" => "Other",
            )),
        };
        let mapping = LobMapping::from_config(&config);
        assert_eq!(mapping.map("Yacht"), "Marine");
        assert_eq!(mapping.map("Pet"), "Other");
        assert_eq!(mapping.map("Boat"), "Boat");
        assert_eq!(mapping.map("Nope"), "Unclassified");
        assert_eq!(mapping.default_category(), "Unclassified");
    }
}
