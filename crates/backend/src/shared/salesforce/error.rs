use thiserror::Error;

/// Errors of the Salesforce client
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(&'static str),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Salesforce API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse Salesforce response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CrmError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("Request timeout: {}", e)
        } else if e.is_connect() {
            format!("Connection error: {}", e)
        } else if e.is_request() {
            format!("Request error: {}", e)
        } else {
            e.to_string()
        };
        CrmError::Network(message)
    }
}
