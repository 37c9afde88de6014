use async_trait::async_trait;
use serde_json::Value;

use super::error::CrmError;
use super::soql::{AggregateQuery, LookupQuery};

/// Read access to the CRM record store
///
/// Rows come back as JSON objects; callers parse them into typed rows for
/// their query shape.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Grouped count query, one row per group
    async fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<Value>, CrmError>;

    /// Record lookup by filter
    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<Value>, CrmError>;
}
