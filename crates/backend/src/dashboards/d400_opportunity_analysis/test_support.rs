use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::query_builder::{OWNER_ALIAS, PRODUCER_ALIAS};
use crate::shared::salesforce::{AggregateQuery, CrmError, LookupQuery, RecordStore};

/// In-memory record store with canned rows per query shape
///
/// Every query it receives is recorded as SOQL. `fail_on` names the shape
/// that answers with an HTTP 500: "overall_by_type", "with_producer_by_type",
/// "without_producer_by_type" or "producer_names".
#[derive(Default)]
pub struct MockStore {
    pub overall: Vec<Value>,
    pub with_producer: Vec<Value>,
    pub without_producer: Vec<Value>,
    pub producers: Vec<Value>,
    pub fail_on: Option<&'static str>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, shape: &'static str, soql: String, rows: &[Value]) -> Result<Vec<Value>, CrmError> {
        self.calls.lock().unwrap().push(soql);
        if self.fail_on == Some(shape) {
            return Err(CrmError::Api {
                status: 500,
                message: format!("{} unavailable", shape),
            });
        }
        Ok(rows.to_vec())
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<Value>, CrmError> {
        let first_key = query.group_by.first().map(|f| f.key());
        match first_key {
            Some(key) if key == PRODUCER_ALIAS => {
                self.answer("with_producer_by_type", query.to_soql(), &self.with_producer)
            }
            Some(key) if key == OWNER_ALIAS => {
                self.answer("without_producer_by_type", query.to_soql(), &self.without_producer)
            }
            _ => self.answer("overall_by_type", query.to_soql(), &self.overall),
        }
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<Value>, CrmError> {
        self.answer("producer_names", query.to_soql(), &self.producers)
    }
}
