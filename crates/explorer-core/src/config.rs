//! Centralized configuration for the explorer core.
//!
//! Constant groups hold defaults; [`ExplorerConfig`] is the runtime
//! configuration assembled from those defaults and the environment.

use crate::error::{ExplorerError, Result};
use std::time::Duration;

/// Storage account layout used when nothing else is configured.
pub struct StorageDefaults;

impl StorageDefaults {
    pub const ACCOUNT_NAME: &'static str = "instagramarash";
    pub const TABLE_NAME: &'static str = "ImageMetadataTableNew";
    pub const CONTAINER_NAME: &'static str = "image-metadata";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "image-explorer/0.1";
    /// Storage REST API version sent as `x-ms-version`.
    pub const STORAGE_API_VERSION: &'static str = "2021-08-06";
    /// Upper bound on continuation pages followed for one table listing.
    pub const TABLE_MAX_PAGES: u32 = 10_000;
}

/// Gallery paging defaults.
pub struct GalleryConfig;

impl GalleryConfig {
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const DEFAULT_CONCURRENCY: usize = 4;
}

/// Environment variable names read by [`ExplorerConfig::from_env`].
pub struct EnvVars;

impl EnvVars {
    pub const ACCOUNT: &'static str = "EXPLORER_STORAGE_ACCOUNT";
    pub const TABLE: &'static str = "EXPLORER_TABLE_NAME";
    pub const CONTAINER: &'static str = "EXPLORER_CONTAINER_NAME";
    pub const TABLE_ENDPOINT: &'static str = "EXPLORER_TABLE_ENDPOINT";
    pub const BLOB_ENDPOINT: &'static str = "EXPLORER_BLOB_ENDPOINT";
    pub const REQUEST_TIMEOUT_SECS: &'static str = "EXPLORER_REQUEST_TIMEOUT_SECS";
}

/// Runtime configuration for the table and blob clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub account_name: String,
    pub table_name: String,
    /// Blob container name. Also the marker used to split image URLs.
    pub container_name: String,
    /// Overrides `https://{account}.table.core.windows.net`.
    pub table_endpoint: Option<String>,
    /// Overrides `https://{account}.blob.core.windows.net`.
    pub blob_endpoint: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            account_name: StorageDefaults::ACCOUNT_NAME.to_string(),
            table_name: StorageDefaults::TABLE_NAME.to_string(),
            container_name: StorageDefaults::CONTAINER_NAME.to_string(),
            table_endpoint: None,
            blob_endpoint: None,
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
        }
    }
}

impl ExplorerConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(account) = non_empty(EnvVars::ACCOUNT) {
            config.account_name = account;
        }
        if let Some(table) = non_empty(EnvVars::TABLE) {
            config.table_name = table;
        }
        if let Some(container) = non_empty(EnvVars::CONTAINER) {
            config.container_name = container;
        }
        config.table_endpoint = non_empty(EnvVars::TABLE_ENDPOINT);
        config.blob_endpoint = non_empty(EnvVars::BLOB_ENDPOINT);

        if let Some(raw) = non_empty(EnvVars::REQUEST_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ExplorerError::Config {
                message: format!(
                    "{} must be a whole number of seconds, got {:?}",
                    EnvVars::REQUEST_TIMEOUT_SECS,
                    raw
                ),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("account_name", &self.account_name),
            ("table_name", &self.table_name),
            ("container_name", &self.container_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ExplorerError::Validation {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if self.request_timeout.is_zero() {
            return Err(ExplorerError::Validation {
                field: "request_timeout".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn table_endpoint(&self) -> String {
        match &self.table_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.table.core.windows.net", self.account_name),
        }
    }

    pub fn blob_endpoint(&self) -> String {
        match &self.blob_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account_name),
        }
    }
}
