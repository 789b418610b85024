use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::store::StoreResult;

/// Verifies a bearer token and returns the subject id it was issued to.
///
/// `Ok(None)` means the token is not valid; `Err` means the verifier itself
/// could not be consulted.
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> StoreResult<Option<String>>;
}

/// Fixed token-to-subject table, for development and tests
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, String>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> StoreResult<Option<String>> {
        Ok(self.tokens.get(token).cloned())
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    iss: String,
    sub: String,
}

/// Asks an OAuth tokeninfo endpoint (`GET {url}?id_token=...`) about the token
#[derive(Debug, Clone)]
pub struct TokenInfoVerifier {
    client: Client,
    url: String,
    allowed_issuers: Vec<String>,
}

impl TokenInfoVerifier {
    pub fn new(url: impl Into<String>, allowed_issuers: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            allowed_issuers,
        }
    }

    fn accepts_issuer(&self, iss: &str) -> bool {
        self.allowed_issuers.iter().any(|allowed| allowed == iss)
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for TokenInfoVerifier {
    async fn verify(&self, token: &str) -> StoreResult<Option<String>> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("id_token", token)])
            .send()
            .await?;

        // tokeninfo answers 400 for expired or forged tokens
        if response.status().is_client_error() {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(crate::store::StoreError::rejected(
                status,
                "identity verifier failed",
            ));
        }

        let info: TokenInfo = response.json().await?;
        if !self.accepts_issuer(&info.iss) {
            log::warn!("token issued by unexpected issuer {}", info.iss);
            return Ok(None);
        }
        Ok(Some(info.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::default().with_token("tok-1", "110169484474386276334");
        assert_eq!(
            verifier.verify("tok-1").await.unwrap().as_deref(),
            Some("110169484474386276334")
        );
        assert_eq!(verifier.verify("tok-2").await.unwrap(), None);
    }

    #[test]
    fn test_issuer_allow_list() {
        let verifier = TokenInfoVerifier::new(
            "https://oauth2.googleapis.com/tokeninfo",
            vec![
                "accounts.google.com".to_string(),
                "https://accounts.google.com".to_string(),
            ],
        );
        assert!(verifier.accepts_issuer("https://accounts.google.com"));
        assert!(!verifier.accepts_issuer("https://evil.example.com"));
    }
}
