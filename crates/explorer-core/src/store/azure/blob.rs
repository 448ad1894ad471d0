//! Azure Blob Storage client.

use super::credential::CredentialProvider;
use super::storage_headers;
use crate::error::{ExplorerError, Result};
use crate::network::{describe_failure, HttpClient};
use crate::store::BlobStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Read-only client for one blob container.
pub struct AzureBlobClient {
    http: HttpClient,
    endpoint: String,
    container: String,
    credential: Arc<dyn CredentialProvider>,
}

impl AzureBlobClient {
    /// Create a client for `container` under `endpoint`
    /// (e.g. `https://acct.blob.core.windows.net`).
    pub fn new(
        http: HttpClient,
        endpoint: impl Into<String>,
        container: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let container = container.into();
        if container.is_empty() || container.contains('/') {
            return Err(ExplorerError::Validation {
                field: "container_name".to_string(),
                message: format!("{:?} is not a valid container name", container),
            });
        }
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            container,
            credential,
        })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// URL of the blob at `path`, with each path segment percent-encoded.
    pub fn blob_url(&self, path: &str) -> Result<url::Url> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(ExplorerError::Validation {
                field: "path".to_string(),
                message: "blob path is empty".to_string(),
            });
        }
        let raw = format!(
            "{}/{}/{}",
            self.endpoint,
            self.container,
            encode_blob_path(path)
        );
        url::Url::parse(&raw).map_err(|e| ExplorerError::Config {
            message: format!("Invalid blob endpoint {}: {}", self.endpoint, e),
        })
    }
}

/// Percent-encode each segment of a blob path, keeping the separators.
pub fn encode_blob_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl BlobStore for AzureBlobClient {
    fn name(&self) -> &str {
        "azure-blob"
    }

    async fn fetch_blob(&self, path: &str) -> Result<Bytes> {
        let mut url = self.blob_url(path)?;
        let mut headers = storage_headers();
        self.credential
            .authorization()
            .await?
            .apply(&mut url, &mut headers)?;

        let response = self.http.get_with_headers(url.as_str(), headers).await?;
        let status = response.status();
        if HttpClient::is_not_found(status) {
            return Err(ExplorerError::BlobNotFound {
                path: path.to_string(),
            });
        }
        if HttpClient::is_access_denied(status) {
            return Err(ExplorerError::AccessDenied {
                resource: format!("{}/{}", self.container, path),
            });
        }
        if !status.is_success() {
            return Err(ExplorerError::Network {
                message: format!(
                    "reading blob {} failed: {}",
                    path,
                    describe_failure(response).await
                ),
            });
        }

        let data = response.bytes().await?;
        debug!("Read blob {} ({} bytes)", path, data.len());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::azure::StaticCredential;

    fn client() -> AzureBlobClient {
        AzureBlobClient::new(
            HttpClient::new().unwrap(),
            "https://acct.blob.core.windows.net",
            "image-metadata",
            Arc::new(StaticCredential::anonymous()),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_blob_path() {
        assert_eq!(encode_blob_path("2024/a.jpg"), "2024/a.jpg");
        assert_eq!(
            encode_blob_path("2024/my cat #1.jpg"),
            "2024/my%20cat%20%231.jpg"
        );
    }

    #[test]
    fn test_blob_url() {
        assert_eq!(
            client().blob_url("/2024/a.jpg").unwrap().as_str(),
            "https://acct.blob.core.windows.net/image-metadata/2024/a.jpg"
        );
        assert!(matches!(
            client().blob_url(""),
            Err(ExplorerError::Validation { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_container() {
        let result = AzureBlobClient::new(
            HttpClient::new().unwrap(),
            "https://acct.blob.core.windows.net",
            "a/b",
            Arc::new(StaticCredential::anonymous()),
        );
        assert!(result.is_err());
    }
}
