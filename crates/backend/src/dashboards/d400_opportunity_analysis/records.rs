//! Typed rows for each query shape, parsed from the raw JSON records.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::shared::salesforce::CrmError;

/// Row of query 1 (`GROUP BY Type`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "Type", default)]
    pub opportunity_type: Option<String>,
    #[serde(rename = "oppCount", default)]
    pub count: i64,
}

/// Row of query 2 (`GROUP BY Producer__c, Type`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProducerTypeCount {
    #[serde(rename = "producerId", default)]
    pub producer_id: Option<String>,
    #[serde(rename = "Type", default)]
    pub opportunity_type: Option<String>,
    #[serde(rename = "oppCount", default)]
    pub count: i64,
}

/// Row of query 3 (`GROUP BY Owner.Name, Type`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OwnerTypeCount {
    #[serde(rename = "ownerName", default)]
    pub owner_name: Option<String>,
    #[serde(rename = "Type", default)]
    pub opportunity_type: Option<String>,
    #[serde(rename = "oppCount", default)]
    pub count: i64,
}

/// Producer record with its linked internal user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProducerRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "InternalUser", default)]
    pub internal_user: Option<UserName>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserName {
    #[serde(rename = "FirstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default)]
    pub last_name: Option<String>,
}

impl UserName {
    /// "First Last", trimmed; None when both parts are blank
    pub fn display_name(&self) -> Option<String> {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            None
        } else {
            Some(full.to_string())
        }
    }
}

/// Parse raw records into `T`, naming the query shape and row on failure
pub fn parse_rows<T: DeserializeOwned>(
    shape: &'static str,
    rows: Vec<Value>,
) -> Result<Vec<T>, CrmError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value::<T>(row)
                .map_err(|e| CrmError::Parse(format!("{} row {}: {}", shape, idx, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_rows() {
        let rows = vec![
            json!({"attributes": {"type": "AggregateResult"}, "Type": "Yacht", "oppCount": 4}),
            json!({"attributes": {"type": "AggregateResult"}, "Type": null, "oppCount": 1}),
        ];
        let parsed: Vec<TypeCount> = parse_rows("overall_by_type", rows).unwrap();
        assert_eq!(parsed[0].opportunity_type.as_deref(), Some("Yacht"));
        assert_eq!(parsed[0].count, 4);
        assert_eq!(parsed[1].opportunity_type, None);

        let owner: Vec<OwnerTypeCount> = parse_rows(
            "without_producer_by_type",
            vec![json!({"ownerName": "Sam Smith", "Type": "Life", "oppCount": 2})],
        )
        .unwrap();
        assert_eq!(owner[0].owner_name.as_deref(), Some("Sam Smith"));
    }

    #[test]
    fn test_bad_row_is_reported() {
        let rows = vec![
            json!({"Type": "Boat", "oppCount": 1}),
            json!({"Type": "Boat", "oppCount": "many"}),
        ];
        let err = parse_rows::<TypeCount>("overall_by_type", rows).unwrap_err();
        assert!(err.to_string().contains("overall_by_type row 1"));
    }

    #[test]
    fn test_producer_record_display_name() {
        let records: Vec<ProducerRecord> = parse_rows(
            "producer_names",
            vec![
                json!({"Id": "P2", "InternalUser": {"FirstName": "Jane", "LastName": "Doe"}}),
                json!({"Id": "P3", "InternalUser": {"FirstName": null, "LastName": " Cher "}}),
                json!({"Id": "P4", "InternalUser": null}),
                json!({"Id": "P1", "InternalUser": {"FirstName": "", "LastName": ""}}),
            ],
        )
        .unwrap();

        let names: Vec<Option<String>> = records
            .iter()
            .map(|r| r.internal_user.as_ref().and_then(UserName::display_name))
            .collect();
        assert_eq!(
            names,
            vec![Some("Jane Doe".to_string()), Some("Cher".to_string()), None, None]
        );
    }
}
