use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::error::CrmError;
use super::soap;
use super::soql::{AggregateQuery, LookupQuery};
use super::store::RecordStore;
use crate::shared::config::{Credentials, SalesforceConfig};
use crate::shared::format::preview;

/// Authenticated Salesforce REST client
///
/// One instance per report run: it owns its session and is dropped with the run.
pub struct SalesforceClient {
    client: reqwest::Client,
    api_version: String,
    instance_url: String,
    session_id: String,
}

/// One page of `GET /services/data/vXX.X/query`
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "totalSize", default)]
    total_size: i64,
    done: bool,
    #[serde(default)]
    records: Vec<Value>,
    #[serde(rename = "nextRecordsUrl", default)]
    next_records_url: Option<String>,
}

/// Element of the error array returned by the REST API
#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    #[serde(rename = "errorCode", default)]
    error_code: String,
    #[serde(default)]
    message: String,
}

impl SalesforceClient {
    /// Log in with username, password and security token (SOAP partner API)
    pub async fn login(
        settings: &SalesforceConfig,
        credentials: &Credentials,
    ) -> Result<Self, CrmError> {
        if let Some(var) = credentials.missing() {
            return Err(CrmError::MissingCredentials(var));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| CrmError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let url = format!(
            "{}/services/Soap/u/{}",
            settings.login_url.trim_end_matches('/'),
            settings.api_version
        );
        tracing::info!(
            "Salesforce login: POST {} (username='{}')",
            url,
            credentials.masked_username()
        );

        let body = soap::login_envelope(
            &credentials.username,
            &credentials.password,
            &credentials.security_token,
        );
        let start_time = std::time::Instant::now();
        let response = client
            .post(&url)
            .header("Content-Type", "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::info!(
            "Salesforce login completed in {:.2}s with status {}",
            start_time.elapsed().as_secs_f64(),
            status
        );

        // Non-XML error pages fall through to the status check
        if let Ok(Some(fault)) = soap::extract_tag(&text, "faultstring") {
            return Err(CrmError::Authentication(fault));
        }
        if !status.is_success() {
            return Err(CrmError::Authentication(format!(
                "login returned status {}: {}",
                status,
                preview(&text, 300)
            )));
        }

        let session_id = soap::extract_tag(&text, "sessionId")?
            .ok_or_else(|| CrmError::Parse("sessionId missing in login response".to_string()))?;
        let server_url = soap::extract_tag(&text, "serverUrl")?
            .ok_or_else(|| CrmError::Parse("serverUrl missing in login response".to_string()))?;
        let instance_url = soap::instance_url(&server_url)
            .ok_or_else(|| CrmError::Parse(format!("Invalid serverUrl '{}'", server_url)))?;

        tracing::info!("Salesforce session opened on {}", instance_url);

        Ok(Self {
            client,
            api_version: settings.api_version.clone(),
            instance_url,
            session_id,
        })
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Run a SOQL query and follow `nextRecordsUrl` until all pages are read
    pub async fn query_all(&self, soql: &str) -> Result<Vec<Value>, CrmError> {
        tracing::info!("SOQL: {}", soql);

        let mut url = format!(
            "{}/services/data/v{}/query?q={}",
            self.instance_url,
            self.api_version,
            urlencoding::encode(soql)
        );
        let mut records = Vec::new();

        loop {
            let page = self.fetch_page(&url).await?;
            tracing::debug!(
                "Query page: {} records (total {}, done={})",
                page.records.len(),
                page.total_size,
                page.done
            );
            records.extend(page.records);

            match page.next_records_url {
                Some(next) if !page.done => url = format!("{}{}", self.instance_url, next),
                _ => break,
            }
        }

        tracing::info!("SOQL returned {} records", records.len());
        Ok(records)
    }

    async fn fetch_page(&self, url: &str) -> Result<QueryPage, CrmError> {
        let start_time = std::time::Instant::now();
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.session_id)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(
            "Request completed in {:.2}s with status {}",
            start_time.elapsed().as_secs_f64(),
            status
        );

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("Salesforce query failed: {}", body);
            return Err(CrmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        tracing::debug!("Salesforce response preview: {}", preview(&body, 500));
        serde_json::from_str::<QueryPage>(&body).map_err(|e| {
            tracing::error!("Failed to parse query response. Error: {}", e);
            CrmError::Parse(format!("{}. Response: {}", e, preview(&body, 300)))
        })
    }
}

/// "INVALID_FIELD: No such column 'Producer__c'" from the REST error array,
/// or the raw body when it has another shape
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<Vec<ApiErrorItem>>(body) {
        Ok(items) if !items.is_empty() => items
            .iter()
            .map(|item| format!("{}: {}", item.error_code, item.message))
            .collect::<Vec<_>>()
            .join("; "),
        _ => preview(body, 300),
    }
}

#[async_trait]
impl RecordStore for SalesforceClient {
    async fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<Value>, CrmError> {
        self.query_all(&query.to_soql()).await
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Vec<Value>, CrmError> {
        self.query_all(&query.to_soql()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let body = r#"[{"message":"No such column 'Producer__c' on entity 'Opportunity'","errorCode":"INVALID_FIELD"}]"#;
        assert_eq!(
            api_error_message(body),
            "INVALID_FIELD: No such column 'Producer__c' on entity 'Opportunity'"
        );
        assert_eq!(api_error_message("Service Unavailable"), "Service Unavailable");
    }

    #[test]
    fn test_query_page_shape() {
        let body = r#"{
            "totalSize": 2,
            "done": false,
            "nextRecordsUrl": "/services/data/v59.0/query/01gD0000002HU6KIAW-2000",
            "records": [
                {"attributes": {"type": "AggregateResult"}, "Type": "Yacht", "oppCount": 4},
                {"attributes": {"type": "AggregateResult"}, "Type": null, "oppCount": 1}
            ]
        }"#;
        let page: QueryPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_size, 2);
        assert!(!page.done);
        assert_eq!(page.records.len(), 2);
        assert!(page.next_records_url.unwrap().ends_with("-2000"));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let settings = SalesforceConfig {
            login_url: "https://login.salesforce.com".to_string(),
            api_version: "59.0".to_string(),
            timeout_secs: 5,
        };
        let result = SalesforceClient::login(&settings, &Credentials::default()).await;
        assert!(matches!(result, Err(CrmError::MissingCredentials("SF_USERNAME"))));
    }
}
