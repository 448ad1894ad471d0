//! Credential seam for the storage clients.
//!
//! Acquiring tokens is the caller's business. The clients only ask a
//! [`CredentialProvider`] for an [`Authorization`] before each request.

use crate::error::{ExplorerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fmt;

/// How a single request is authorized.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// OAuth bearer token sent in the `Authorization` header.
    Bearer(String),
    /// Shared access signature appended to the query string.
    SasToken(String),
    /// Public containers/tables.
    Anonymous,
}

impl Authorization {
    /// Add the credential to a request's headers and URL.
    pub fn apply(&self, url: &mut url::Url, headers: &mut HeaderMap) -> Result<()> {
        match self {
            Authorization::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    ExplorerError::Config {
                        message: "bearer token contains invalid header characters".to_string(),
                    }
                })?;
                headers.insert(AUTHORIZATION, value);
            }
            Authorization::SasToken(sas) => {
                let sas = sas.trim_start_matches('?');
                let merged = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{}&{}", existing, sas),
                    _ => sas.to_string(),
                };
                url.set_query(Some(&merged));
            }
            Authorization::Anonymous => {}
        }
        Ok(())
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Authorization::SasToken(_) => f.write_str("SasToken(<redacted>)"),
            Authorization::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Supplies the identity used by the table and blob clients.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authorization(&self) -> Result<Authorization>;
}

/// A credential fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticCredential(Authorization);

impl StaticCredential {
    pub const BEARER_TOKEN_VAR: &'static str = "AZURE_STORAGE_BEARER_TOKEN";
    pub const SAS_TOKEN_VAR: &'static str = "AZURE_STORAGE_SAS_TOKEN";

    pub fn new(authorization: Authorization) -> Self {
        Self(authorization)
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self(Authorization::Bearer(token.into()))
    }

    pub fn sas(token: impl Into<String>) -> Self {
        Self(Authorization::SasToken(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(Authorization::Anonymous)
    }

    /// Read a bearer token, then a SAS token, from the environment.
    ///
    /// Falls back to anonymous access when neither is set.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        if let Some(token) = read(Self::BEARER_TOKEN_VAR) {
            Self::bearer(token)
        } else if let Some(sas) = read(Self::SAS_TOKEN_VAR) {
            Self::sas(sas)
        } else {
            Self::anonymous()
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn authorization(&self) -> Result<Authorization> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_sets_header() {
        let mut url = url::Url::parse("https://a.blob.core.windows.net/c/x.jpg").unwrap();
        let mut headers = HeaderMap::new();
        Authorization::Bearer("tok".into())
            .apply(&mut url, &mut headers)
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_sas_merges_query() {
        let mut url =
            url::Url::parse("https://a.table.core.windows.net/T()?NextRowKey=5").unwrap();
        let mut headers = HeaderMap::new();
        Authorization::SasToken("?sv=2021&sig=abc".into())
            .apply(&mut url, &mut headers)
            .unwrap();
        assert_eq!(url.query(), Some("NextRowKey=5&sv=2021&sig=abc"));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let shown = format!("{:?}", StaticCredential::bearer("super-secret"));
        assert!(!shown.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_static_credential() {
        let cred = StaticCredential::anonymous();
        assert_eq!(cred.authorization().await.unwrap(), Authorization::Anonymous);
    }
}
