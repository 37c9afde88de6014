use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Category used when a raw opportunity type has no rule
pub const DEFAULT_LOB_CATEGORY: &str = "Other";

/// Display name used when a producer or owner name cannot be resolved
pub const NAME_NOT_PROVIDED: &str = "Name Not Provided";

/// Date format used on the wire ("YYYY-MM-DD")
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request for the opportunity analysis dashboard
///
/// Both dates are inclusive. Missing dates are filled in by the backend
/// (last N days ending today).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpportunityAnalysisRequest {
    /// Start date in format "YYYY-MM-DD"
    #[serde(default)]
    pub date_from: Option<String>,
    /// End date in format "YYYY-MM-DD"
    #[serde(default)]
    pub date_to: Option<String>,
}

impl OpportunityAnalysisRequest {
    pub fn new(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            date_from: Some(date_from.into()),
            date_to: Some(date_to.into()),
        }
    }

    /// Range of `days` days ending at `today`
    pub fn for_last_days(today: NaiveDate, days: i64) -> Self {
        let from = today - Duration::days(days);
        Self::new(
            from.format(DATE_FORMAT).to_string(),
            today.format(DATE_FORMAT).to_string(),
        )
    }
}

/// Which raw table to export as CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    Lob,
    Producer,
}

impl ExportTable {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportTable::Lob => "opportunities_by_lob.csv",
            ExportTable::Producer => "opportunities_by_producer.csv",
        }
    }
}

/// Request for a CSV export of one raw table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    pub table: ExportTable,
}

impl ExportRequest {
    pub fn analysis_request(&self) -> OpportunityAnalysisRequest {
        OpportunityAnalysisRequest {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
        }
    }
}

/// One row of the overall line-of-business table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobReportRow {
    /// Raw picklist value of Opportunity.Type (None when the field is empty)
    pub opportunity_type: Option<String>,
    /// Normalized line of business
    pub lob_category: String,
    pub count: i64,
}

/// One row of the producer table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerReportRow {
    /// Producer display name, or the owner's name for opportunities without a producer
    pub producer: String,
    pub opportunity_type: Option<String>,
    pub lob_category: String,
    pub count: i64,
}

/// Sum of counts for one line of business (pie chart slice)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobCategoryTotal {
    pub lob_category: String,
    pub count: i64,
}

/// Sum of counts for one producer and line of business (one bar)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerCategoryTotal {
    pub producer: String,
    pub lob_category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// All queries finished, tables are complete
    Completed,
    /// A query or the login failed, tables are empty
    Failed,
}

/// Response for the opportunity analysis dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityAnalysisResponse {
    /// Effective start date "YYYY-MM-DD"
    pub date_from: String,
    /// Effective end date "YYYY-MM-DD"
    pub date_to: String,
    pub status: ReportStatus,
    /// User-facing error message when status is Failed
    pub error: Option<String>,
    /// Raw rows of the overall aggregation by type
    pub lob_rows: Vec<LobReportRow>,
    /// Raw rows of the producer aggregations (named producers and owners)
    pub producer_rows: Vec<ProducerReportRow>,
    /// Totals by line of business, sorted by category
    pub lob_summary: Vec<LobCategoryTotal>,
    /// Totals by producer and line of business, sorted by producer then category
    pub producer_summary: Vec<ProducerCategoryTotal>,
    /// Raw types that had no rule and fell back to the default category
    #[serde(default)]
    pub unmapped_types: Vec<String>,
}

impl OpportunityAnalysisResponse {
    /// Empty response for a failed run
    pub fn failed(date_from: String, date_to: String, error: impl Into<String>) -> Self {
        Self {
            date_from,
            date_to,
            status: ReportStatus::Failed,
            error: Some(error.into()),
            lob_rows: Vec::new(),
            producer_rows: Vec::new(),
            lob_summary: Vec::new(),
            producer_summary: Vec::new(),
            unmapped_types: Vec::new(),
        }
    }

    pub fn total_opportunities(&self) -> i64 {
        self.lob_rows.iter().map(|r| r.count).sum()
    }
}

/// Result of POST /api/d400/connection/test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    /// Salesforce instance the session was opened on
    pub instance_url: Option<String>,
}
