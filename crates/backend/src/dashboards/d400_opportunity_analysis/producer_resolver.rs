use contracts::dashboards::d400_opportunity_analysis::NAME_NOT_PROVIDED;
use std::collections::{BTreeSet, HashMap};

use super::query_builder;
use super::records::{parse_rows, ProducerRecord, UserName};
use crate::shared::salesforce::{CrmError, RecordStore};

/// Resolve producer ids to display names with one batched lookup
///
/// Ids the store does not return are left out of the map; callers apply the
/// sentinel name themselves. An empty id set issues no query.
pub async fn resolve_producers<S: RecordStore + ?Sized>(
    store: &S,
    ids: &BTreeSet<String>,
) -> Result<HashMap<String, String>, CrmError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = store.lookup(&query_builder::producer_names(ids)).await?;
    let records: Vec<ProducerRecord> = parse_rows("producer_names", rows)?;

    let names: HashMap<String, String> = records
        .into_iter()
        .map(|record| {
            let name = record
                .internal_user
                .as_ref()
                .and_then(UserName::display_name)
                .unwrap_or_else(|| NAME_NOT_PROVIDED.to_string());
            (record.id, name)
        })
        .collect();

    if names.len() < ids.len() {
        tracing::debug!(
            "Producer lookup resolved {} of {} ids",
            names.len(),
            ids.len()
        );
    }
    Ok(names)
}
