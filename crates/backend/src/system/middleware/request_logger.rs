use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Duration;

use crate::shared::format::format_number;

/// Requests slower than this are logged as warnings
const SLOW_REQUEST: Duration = Duration::from_secs(10);

/// Log one line per HTTP request: duration, response size, status, method and path
///
/// Report runs call Salesforce several times, so the duration column is the
/// one to watch.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(
                "{} | failed to read response body: {}",
                log_line(&method, &path, parts.status, start.elapsed(), None),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed = start.elapsed();
    let line = log_line(&method, &path, parts.status, elapsed, Some(bytes.len()));
    if parts.status.is_server_error() || elapsed >= SLOW_REQUEST {
        tracing::warn!("{}", line);
    } else {
        tracing::info!("{}", line);
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn log_line(
    method: &Method,
    path: &str,
    status: StatusCode,
    elapsed: Duration,
    size: Option<usize>,
) -> String {
    let size = size.map(format_number).unwrap_or_else(|| "error".to_string());
    format!(
        "{:>6}ms | {:>12} | {} {:>6} {}",
        elapsed.as_millis(),
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line() {
        let line = log_line(
            &Method::GET,
            "/api/d400/opportunity_analysis",
            StatusCode::OK,
            Duration::from_millis(1234),
            Some(45_678),
        );
        assert_eq!(
            line,
            "  1234ms |       45,678 | 200    GET /api/d400/opportunity_analysis"
        );
    }

    #[test]
    fn test_log_line_without_size() {
        let line = log_line(
            &Method::POST,
            "/x",
            StatusCode::BAD_GATEWAY,
            Duration::from_millis(5),
            None,
        );
        assert!(line.contains("error | 502"));
    }
}
