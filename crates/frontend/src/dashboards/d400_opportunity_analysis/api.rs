use contracts::dashboards::d400_opportunity_analysis::{
    ConnectionTestResult, ExportRequest, OpportunityAnalysisRequest, OpportunityAnalysisResponse,
};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

const API_BASE: &str = "/api/d400";

/// Log in to Salesforce with the server's credentials
pub async fn test_connection() -> Result<ConnectionTestResult, String> {
    let url = api_url(&format!("{}/connection/test", API_BASE));

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Run the report for a period
///
/// A Salesforce failure is not an `Err` here: it comes back as a response
/// with `status = failed` and the message in `error`.
pub async fn get_opportunity_analysis(
    request: &OpportunityAnalysisRequest,
) -> Result<OpportunityAnalysisResponse, String> {
    let query = serde_qs::to_string(request).map_err(|e| e.to_string())?;
    let url = api_url(&format!("{}/opportunity_analysis?{}", API_BASE, query));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Download link for one raw table as CSV
pub fn export_url(request: &ExportRequest) -> String {
    let query = serde_qs::to_string(request).unwrap_or_default();
    api_url(&format!("{}/opportunity_analysis/export?{}", API_BASE, query))
}
