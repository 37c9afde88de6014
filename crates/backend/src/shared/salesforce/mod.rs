//! Read-only Salesforce access: SOAP login, REST queries and the
//! `RecordStore` seam the report pipeline is written against.

pub mod client;
pub mod error;
pub mod soap;
pub mod soql;
pub mod store;

pub use client::SalesforceClient;
pub use error::CrmError;
pub use soql::{AggregateQuery, CountField, Field, LookupQuery, Predicate};
pub use store::RecordStore;
