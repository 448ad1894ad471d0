//! Azure Storage REST clients.
//!
//! Both clients are read-only and make exactly one attempt per request.

mod blob;
mod credential;
mod table;

pub use blob::{encode_blob_path, AzureBlobClient};
pub use credential::{Authorization, CredentialProvider, StaticCredential};
pub use table::{AzureTableClient, ContinuationToken};

use crate::config::NetworkConfig;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};

pub(crate) const ACCEPT_NO_METADATA: &str = "application/json;odata=nometadata";

/// Headers every storage request carries.
pub(crate) fn storage_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-ms-version",
        HeaderValue::from_static(NetworkConfig::STORAGE_API_VERSION),
    );
    let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
    if let Ok(value) = HeaderValue::from_str(&date) {
        headers.insert("x-ms-date", value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_headers() {
        let headers = storage_headers();
        assert_eq!(
            headers.get("x-ms-version").unwrap(),
            NetworkConfig::STORAGE_API_VERSION
        );
        assert!(headers
            .get("x-ms-date")
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with("GMT"));
    }
}
