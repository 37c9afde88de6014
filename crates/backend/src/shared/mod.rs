pub mod app_state;
pub mod config;
pub mod format;
pub mod salesforce;
