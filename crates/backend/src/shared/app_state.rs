use std::sync::Arc;

use crate::dashboards::d400_opportunity_analysis::LobMapping;
use crate::shared::config::{Config, Credentials};

/// Read-only state shared by all requests
///
/// Built once at startup. Salesforce sessions are not kept here: every
/// report run logs in and owns its own client.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub mapping: LobMapping,
    pub credentials: Credentials,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config, credentials: Credentials) -> Self {
        let mapping = LobMapping::from_config(&config.report);
        Self {
            config,
            mapping,
            credentials,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
