//! Azure Table Storage client.
//!
//! Lists every entity of one table through the Table service REST API,
//! following continuation headers until the listing is exhausted.

use super::credential::CredentialProvider;
use super::{storage_headers, ACCEPT_NO_METADATA};
use crate::config::NetworkConfig;
use crate::error::{ExplorerError, Result};
use crate::models::Entity;
use crate::network::{describe_failure, HttpClient};
use crate::store::RecordStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const NEXT_PARTITION_KEY_HEADER: &str = "x-ms-continuation-nextpartitionkey";
const NEXT_ROW_KEY_HEADER: &str = "x-ms-continuation-nextrowkey";

/// Continuation point returned by the Table service between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationToken {
    pub next_partition_key: String,
    pub next_row_key: Option<String>,
}

impl ContinuationToken {
    /// Read the continuation headers of a page response, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        read(NEXT_PARTITION_KEY_HEADER).map(|next_partition_key| Self {
            next_partition_key,
            next_row_key: read(NEXT_ROW_KEY_HEADER),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TablePage {
    #[serde(default)]
    value: Vec<Entity>,
}

/// Read-only client for one Azure table.
pub struct AzureTableClient {
    http: HttpClient,
    endpoint: String,
    table: String,
    credential: Arc<dyn CredentialProvider>,
}

impl AzureTableClient {
    /// Create a client for `table` under `endpoint`
    /// (e.g. `https://acct.table.core.windows.net`).
    pub fn new(
        http: HttpClient,
        endpoint: impl Into<String>,
        table: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let table = table.into();
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExplorerError::Validation {
                field: "table_name".to_string(),
                message: format!("{:?} is not a valid table name", table),
            });
        }
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            table,
            credential,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// URL of one listing page.
    pub fn page_url(&self, continuation: Option<&ContinuationToken>) -> Result<url::Url> {
        let raw = format!("{}/{}()", self.endpoint, self.table);
        let mut url = url::Url::parse(&raw).map_err(|e| ExplorerError::Config {
            message: format!("Invalid table endpoint {}: {}", self.endpoint, e),
        })?;
        if let Some(token) = continuation {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("NextPartitionKey", &token.next_partition_key);
            if let Some(row_key) = &token.next_row_key {
                pairs.append_pair("NextRowKey", row_key);
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        continuation: Option<&ContinuationToken>,
    ) -> Result<(Vec<Entity>, Option<ContinuationToken>)> {
        let mut url = self.page_url(continuation)?;
        let mut headers = storage_headers();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_NO_METADATA));
        self.credential
            .authorization()
            .await?
            .apply(&mut url, &mut headers)?;

        let response = self.http.get_with_headers(url.as_str(), headers).await?;
        let status = response.status();
        if !status.is_success() {
            if HttpClient::is_access_denied(status) {
                return Err(ExplorerError::AccessDenied {
                    resource: format!("table {}", self.table),
                });
            }
            return Err(ExplorerError::Network {
                message: format!(
                    "listing table {} failed: {}",
                    self.table,
                    describe_failure(response).await
                ),
            });
        }

        let next = ContinuationToken::from_headers(response.headers());
        let body = response.bytes().await?;
        let page: TablePage = serde_json::from_slice(&body)?;
        Ok((page.value, next))
    }
}

#[async_trait]
impl RecordStore for AzureTableClient {
    fn name(&self) -> &str {
        "azure-table"
    }

    async fn list_entities(&self) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        let mut continuation: Option<ContinuationToken> = None;

        for page in 1..=NetworkConfig::TABLE_MAX_PAGES {
            let (batch, next) = self.fetch_page(continuation.as_ref()).await?;
            debug!(
                "Table {} page {}: {} entities",
                self.table,
                page,
                batch.len()
            );
            entities.extend(batch);

            match next {
                Some(token) => continuation = Some(token),
                None => return Ok(entities),
            }
        }

        Err(ExplorerError::Network {
            message: format!(
                "table {} did not finish within {} pages",
                self.table,
                NetworkConfig::TABLE_MAX_PAGES
            ),
        })
    }
}
