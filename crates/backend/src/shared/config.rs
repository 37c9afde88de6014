use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub salesforce: SalesforceConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the built frontend (served at "/"), optional
    #[serde(default)]
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SalesforceConfig {
    /// Login endpoint, "https://test.salesforce.com" for sandboxes
    pub login_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Length of the default period when the request has no dates
    pub default_days: i64,
    pub default_category: String,
    /// Extra or replacement rules: raw Opportunity.Type -> line of business
    #[serde(default)]
    pub lob_overrides: HashMap<String, String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[salesforce]
login_url = "https://login.salesforce.com"
api_version = "59.0"
timeout_secs = 120

[report]
default_days = 30
default_category = "Other"
"#;

/// Environment variables holding the Salesforce credentials
pub const ENV_USERNAME: &str = "SF_USERNAME";
pub const ENV_PASSWORD: &str = "SF_PASSWORD";
pub const ENV_SECURITY_TOKEN: &str = "SF_SECURITY_TOKEN";

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.report.default_days < 0 {
        anyhow::bail!(
            "report.default_days must not be negative, got {}",
            config.report.default_days
        );
    }
    Ok(config)
}

/// Salesforce login credentials
///
/// Only the login step reads them; the password is sent together with the
/// security token.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub security_token: String,
}

impl Credentials {
    /// Read credentials from the environment (a `.env` file is loaded by main)
    pub fn from_env() -> Self {
        Self {
            username: std::env::var(ENV_USERNAME).unwrap_or_default(),
            password: std::env::var(ENV_PASSWORD).unwrap_or_default(),
            security_token: std::env::var(ENV_SECURITY_TOKEN).unwrap_or_default(),
        }
    }

    /// Name of the first missing required variable, if any
    pub fn missing(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            Some(ENV_USERNAME)
        } else if self.password.is_empty() {
            Some(ENV_PASSWORD)
        } else {
            None
        }
    }

    /// Username safe for logs: first character and the domain
    pub fn masked_username(&self) -> String {
        let name = self.username.trim();
        let (local, domain) = name.split_once('@').unwrap_or((name, ""));
        let first: String = local.chars().take(1).collect();
        if domain.is_empty() {
            format!("{}***", first)
        } else {
            format!("{}***@{}", first, domain)
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.masked_username())
            .field("password", &if self.password.is_empty() { "EMPTY" } else { "***" })
            .field(
                "security_token",
                &if self.security_token.is_empty() { "EMPTY" } else { "***" },
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.salesforce.api_version, "59.0");
        assert_eq!(config.report.default_days, 30);
        assert_eq!(config.report.default_category, "Other");
        assert!(config.report.lob_overrides.is_empty());
        assert!(config.server.static_dir.is_none());
    }

    #[test]
    fn test_lob_overrides_section() {
        let contents = r#"
[server]
host = "127.0.0.1"
port = 8080
static_dir = "dist"

[salesforce]
login_url = "https://test.salesforce.com"
api_version = "60.0"
timeout_secs = 30

[report]
default_days = 7
default_category = "Unclassified"

[report.lob_overrides]
"Pet Insurance" = "Other"
"Yacht" = "Marine"
"#;
        let config = parse_config(contents).unwrap();
        assert_eq!(config.server.static_dir.as_deref(), Some("dist"));
        assert_eq!(config.report.lob_overrides.len(), 2);
        assert_eq!(config.report.lob_overrides["Yacht"], "Marine");
    }

    #[test]
    fn test_negative_default_days_rejected() {
        let contents = DEFAULT_CONFIG.replace("default_days = 30", "default_days = -1");
        assert!(parse_config(&contents).is_err());
    }

    #[test]
    fn test_credentials_missing_and_debug_masks_secrets() {
        let credentials = Credentials {
            username: "user@example.com".to_string(),
            password: String::new(),
            security_token: "s3cr3t".to_string(),
        };
        assert_eq!(credentials.missing(), Some(ENV_PASSWORD));

        let printed = format!("{:?}", credentials);
        assert!(printed.contains("u***@example.com"));
        assert!(!printed.contains("user@"));
        assert!(!printed.contains("s3cr3t"));
        assert!(printed.contains("***"));

        let complete = Credentials {
            password: "secret".to_string(),
            ..credentials
        };
        assert_eq!(complete.missing(), None);
    }

    #[test]
    fn test_masked_username() {
        let mut credentials = Credentials {
            username: " jane.doe@acme.com ".to_string(),
            ..Default::default()
        };
        assert_eq!(credentials.masked_username(), "j***@acme.com");

        credentials.username = "integration".to_string();
        assert_eq!(credentials.masked_username(), "i***");

        credentials.username = String::new();
        assert_eq!(credentials.masked_username(), "***");
    }
}
