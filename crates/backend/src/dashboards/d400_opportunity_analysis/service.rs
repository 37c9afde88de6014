use contracts::dashboards::d400_opportunity_analysis::{
    ConnectionTestResult, LobReportRow, OpportunityAnalysisResponse, ProducerReportRow,
    ReportStatus, NAME_NOT_PROVIDED,
};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

use super::date_range::DateRange;
use super::lob_mapping::LobMapping;
use super::producer_resolver::resolve_producers;
use super::query_builder;
use super::records::{parse_rows, OwnerTypeCount, ProducerTypeCount, TypeCount};
use super::summary::{summarize_lob, summarize_producers};
use crate::shared::app_state::AppState;
use crate::shared::salesforce::{CrmError, RecordStore, SalesforceClient};

/// Step of a report run, used to tell which call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStage {
    OverallByType,
    WithProducer,
    WithoutProducer,
    ProducerLookup,
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReportStage::OverallByType => "opportunities by type",
            ReportStage::WithProducer => "opportunities with producer",
            ReportStage::WithoutProducer => "opportunities without producer",
            ReportStage::ProducerLookup => "producer names",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Error connecting to Salesforce: {0}")]
    Authentication(#[source] CrmError),

    #[error("Query '{stage}' failed: {source}")]
    Query {
        stage: ReportStage,
        #[source]
        source: CrmError,
    },
}

fn query_failed(stage: ReportStage) -> impl FnOnce(CrmError) -> ReportError {
    move |source| ReportError::Query { stage, source }
}

/// Both tables of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityReport {
    pub lob_rows: Vec<LobReportRow>,
    pub producer_rows: Vec<ProducerReportRow>,
    /// Raw types without a rule, sorted
    pub unmapped_types: Vec<String>,
}

impl OpportunityReport {
    pub fn into_response(self, range: &DateRange) -> OpportunityAnalysisResponse {
        OpportunityAnalysisResponse {
            date_from: range.date_from(),
            date_to: range.date_to(),
            status: ReportStatus::Completed,
            error: None,
            lob_summary: summarize_lob(&self.lob_rows),
            producer_summary: summarize_producers(&self.producer_rows),
            lob_rows: self.lob_rows,
            producer_rows: self.producer_rows,
            unmapped_types: self.unmapped_types,
        }
    }
}

/// Maps raw types and remembers the ones that had no rule
struct Classifier<'a> {
    mapping: &'a LobMapping,
    unmapped: BTreeSet<String>,
}

impl<'a> Classifier<'a> {
    fn new(mapping: &'a LobMapping) -> Self {
        Self {
            mapping,
            unmapped: BTreeSet::new(),
        }
    }

    fn category(&mut self, raw_type: Option<&str>) -> String {
        if let Some(raw) = raw_type {
            if !self.mapping.is_known(raw) {
                self.unmapped.insert(raw.to_string());
            }
        }
        self.mapping.map_optional(raw_type).to_string()
    }
}

/// Run the three aggregations and the producer lookup, then assemble both tables
///
/// Calls are sequential. The first failure aborts the run, so a caller never
/// sees tables built from a subset of the queries.
pub async fn build_report<S: RecordStore + ?Sized>(
    store: &S,
    mapping: &LobMapping,
    range: &DateRange,
) -> Result<OpportunityReport, ReportError> {
    let mut classifier = Classifier::new(mapping);

    let rows = store
        .aggregate(&query_builder::overall_by_type(range))
        .await
        .and_then(|rows| parse_rows::<TypeCount>("overall_by_type", rows))
        .map_err(query_failed(ReportStage::OverallByType))?;

    let lob_rows: Vec<LobReportRow> = rows
        .into_iter()
        .map(|row| LobReportRow {
            lob_category: classifier.category(row.opportunity_type.as_deref()),
            opportunity_type: row.opportunity_type,
            count: row.count,
        })
        .collect();
    tracing::info!("Opportunities by type: {} groups", lob_rows.len());

    let with_producer = store
        .aggregate(&query_builder::with_producer_by_type(range))
        .await
        .and_then(|rows| parse_rows::<ProducerTypeCount>("with_producer_by_type", rows))
        .map_err(query_failed(ReportStage::WithProducer))?;

    let without_producer = store
        .aggregate(&query_builder::without_producer_by_type(range))
        .await
        .and_then(|rows| parse_rows::<OwnerTypeCount>("without_producer_by_type", rows))
        .map_err(query_failed(ReportStage::WithoutProducer))?;

    tracing::info!(
        "Producer groups: {} with producer, {} without",
        with_producer.len(),
        without_producer.len()
    );

    let producer_ids: BTreeSet<String> = with_producer
        .iter()
        .filter_map(|row| row.producer_id.clone())
        .filter(|id| !id.is_empty())
        .collect();
    let producer_names = resolve_producers(store, &producer_ids)
        .await
        .map_err(query_failed(ReportStage::ProducerLookup))?;

    let mut producer_rows = Vec::with_capacity(with_producer.len() + without_producer.len());

    for row in with_producer {
        let producer = row
            .producer_id
            .as_ref()
            .and_then(|id| producer_names.get(id))
            .cloned()
            .unwrap_or_else(|| NAME_NOT_PROVIDED.to_string());
        producer_rows.push(ProducerReportRow {
            producer,
            lob_category: classifier.category(row.opportunity_type.as_deref()),
            opportunity_type: row.opportunity_type,
            count: row.count,
        });
    }

    for row in without_producer {
        let producer = row
            .owner_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| NAME_NOT_PROVIDED.to_string());
        producer_rows.push(ProducerReportRow {
            producer,
            lob_category: classifier.category(row.opportunity_type.as_deref()),
            opportunity_type: row.opportunity_type,
            count: row.count,
        });
    }

    let unmapped_types: Vec<String> = classifier.unmapped.into_iter().collect();
    if !unmapped_types.is_empty() {
        tracing::warn!(
            "Opportunity types without a line of business rule (counted as '{}'): {}",
            mapping.default_category(),
            unmapped_types.join(", ")
        );
    }

    Ok(OpportunityReport {
        lob_rows,
        producer_rows,
        unmapped_types,
    })
}

/// Log in and build the report; nothing is queried if the login fails
pub async fn run_report(state: &AppState, range: &DateRange) -> Result<OpportunityReport, ReportError> {
    let client = SalesforceClient::login(&state.config.salesforce, &state.credentials)
        .await
        .map_err(ReportError::Authentication)?;
    build_report(&client, &state.mapping, range).await
}

/// Dashboard entry point: failures become an empty, failed response
pub async fn get_opportunity_analysis(
    state: &AppState,
    range: DateRange,
) -> OpportunityAnalysisResponse {
    let run_id = Uuid::new_v4();
    tracing::info!("D400 [{}]: building opportunity analysis for {}", run_id, range);
    if range.is_inverted() {
        tracing::warn!("D400 [{}]: start date is after end date, expecting no data", run_id);
    }

    match run_report(state, &range).await {
        Ok(report) => {
            let response = report.into_response(&range);
            tracing::info!(
                "D400 [{}]: {} opportunities, {} LOB rows, {} producer rows",
                run_id,
                response.total_opportunities(),
                response.lob_rows.len(),
                response.producer_rows.len()
            );
            response
        }
        Err(e) => {
            tracing::error!("D400 [{}]: report failed: {}", run_id, e);
            OpportunityAnalysisResponse::failed(range.date_from(), range.date_to(), e.to_string())
        }
    }
}

/// Check that the configured credentials can open a session
pub async fn test_connection(state: &AppState) -> ConnectionTestResult {
    match SalesforceClient::login(&state.config.salesforce, &state.credentials).await {
        Ok(client) => ConnectionTestResult {
            success: true,
            message: "Connected to Salesforce!".to_string(),
            instance_url: Some(client.instance_url().to_string()),
        },
        Err(e) => {
            tracing::error!("D400: Salesforce connection test failed: {}", e);
            ConnectionTestResult {
                success: false,
                message: format!("Error connecting to Salesforce: {}", e),
                instance_url: None,
            }
        }
    }
}
