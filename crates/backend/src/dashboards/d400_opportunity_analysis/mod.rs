//! D400 Opportunity analysis: opportunities created in a period, counted by
//! line of business and by producer.

pub mod date_range;
pub mod export;
pub mod lob_mapping;
pub mod producer_resolver;
pub mod query_builder;
pub mod records;
pub mod service;
pub mod summary;

pub use date_range::DateRange;
pub use lob_mapping::LobMapping;
pub use service::{build_report, OpportunityReport, ReportError, ReportStage};

#[cfg(test)]
pub(crate) mod test_support;
