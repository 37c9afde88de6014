use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::dashboards::d400_opportunity_analysis::{
    ConnectionTestResult, ExportRequest, OpportunityAnalysisRequest, OpportunityAnalysisResponse,
};

use crate::dashboards::d400_opportunity_analysis::{export, service, DateRange};
use crate::shared::app_state::SharedState;

/// Period of a request; malformed dates are a client error
fn request_range(
    request: &OpportunityAnalysisRequest,
    default_days: i64,
) -> Result<DateRange, StatusCode> {
    let today = chrono::Utc::now().date_naive();
    DateRange::from_request(request, today, default_days).map_err(|e| {
        tracing::warn!("D400 Dashboard: Rejected request: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// GET /api/d400/opportunity_analysis?date_from=2024-01-01&date_to=2024-01-31
///
/// A failed Salesforce run still answers 200 with `status = failed`.
pub async fn get_opportunity_analysis(
    State(state): State<SharedState>,
    Query(request): Query<OpportunityAnalysisRequest>,
) -> Result<Json<OpportunityAnalysisResponse>, StatusCode> {
    let range = request_range(&request, state.config.report.default_days)?;
    Ok(Json(service::get_opportunity_analysis(&state, range).await))
}

/// GET /api/d400/opportunity_analysis/export?date_from=..&date_to=..&table=lob|producer
pub async fn export_csv(
    State(state): State<SharedState>,
    Query(request): Query<ExportRequest>,
) -> Result<Response, (StatusCode, String)> {
    let range = request_range(&request.analysis_request(), state.config.report.default_days)
        .map_err(|status| (status, "Invalid date, expected YYYY-MM-DD".to_string()))?;
    tracing::info!(
        "D400 Dashboard: Exporting {} for {}",
        request.table.file_name(),
        range
    );

    let report = service::run_report(&state, &range).await.map_err(|e| {
        tracing::error!("D400 Dashboard: Export failed: {}", e);
        (StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    let body = export::to_csv(&report, request.table).map_err(|e| {
        tracing::error!("D400 Dashboard: Failed to write CSV: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", request.table.file_name()),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/d400/connection/test
pub async fn test_connection(State(state): State<SharedState>) -> Json<ConnectionTestResult> {
    tracing::info!("D400 Dashboard: Testing Salesforce connection");
    Json(service::test_connection(&state).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_date_is_bad_request() {
        let request = OpportunityAnalysisRequest::new("2024-13-01", "2024-01-31");
        assert_eq!(request_range(&request, 30), Err(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_missing_dates_use_default_window() {
        let range = request_range(&OpportunityAnalysisRequest::default(), 7).unwrap();
        assert_eq!(range.end - range.start, chrono::Duration::days(7));
    }
}
