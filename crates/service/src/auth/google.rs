//! Google ID-token verification.
//!
//! Production uses Google's `tokeninfo` endpoint; tests and local setups
//! use [`StaticIdentityVerifier`].
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::domain::GoogleIdentity;
use super::errors::AuthError;

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError>;
}

/// Subset of the `tokeninfo` response; Google encodes booleans as strings.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
}

pub struct GoogleTokenInfoVerifier {
    client: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl GoogleTokenInfoVerifier {
    /// An empty `client_id` disables the audience check.
    pub fn new(tokeninfo_url: &str, client_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokeninfo_url: tokeninfo_url.to_string(),
            client_id: Some(client_id.trim().to_string()).filter(|c| !c.is_empty()),
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(&cfg.google_tokeninfo_url, &cfg.google_client_id)
    }
}

#[async_trait]
impl IdentityVerifier for GoogleTokenInfoVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError> {
        let resp = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;

        let status = resp.status();
        if status.is_client_error() {
            debug!(%status, "google rejected id token");
            return Err(AuthError::IdentityRejected(format!("tokeninfo answered {status}")));
        }
        if !status.is_success() {
            return Err(AuthError::Upstream(format!("tokeninfo answered {status}")));
        }
        let info: TokenInfo = resp.json().await.map_err(|e| AuthError::Upstream(e.to_string()))?;

        if let Some(expected) = &self.client_id {
            if info.aud.as_deref() != Some(expected.as_str()) {
                warn!(aud = ?info.aud, "google token issued for another client");
                return Err(AuthError::IdentityRejected("audience mismatch".into()));
            }
        }
        if info.email_verified.as_deref() == Some("false") {
            return Err(AuthError::IdentityRejected("email not verified".into()));
        }
        let email = info
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AuthError::IdentityRejected("token carries no email".into()))?;
        Ok(GoogleIdentity { email, name: info.name })
    }
}

/// Fixed token → identity table.
#[derive(Default)]
pub struct StaticIdentityVerifier {
    identities: HashMap<String, GoogleIdentity>,
}

impl StaticIdentityVerifier {
    pub fn with(mut self, token: &str, email: &str, name: Option<&str>) -> Self {
        self.identities.insert(
            token.to_string(),
            GoogleIdentity { email: email.to_string(), name: name.map(str::to_string) },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError> {
        self.identities
            .get(id_token)
            .cloned()
            .ok_or_else(|| AuthError::IdentityRejected("unknown token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_token", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aud": "client-1",
                "email": "ana@gmail.com",
                "email_verified": "true",
                "name": "Ana Rojas"
            })))
            .mount(&server)
            .await;

        let v = GoogleTokenInfoVerifier::new(&format!("{}/tokeninfo", server.uri()), "client-1");
        let id = v.verify("good").await.unwrap();
        assert_eq!(id.email, "ana@gmail.com");
        assert_eq!(id.name.as_deref(), Some("Ana Rojas"));
    }

    #[tokio::test]
    async fn audience_mismatch_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "aud": "someone-else",
                "email": "ana@gmail.com"
            })))
            .mount(&server)
            .await;

        let v = GoogleTokenInfoVerifier::new(&server.uri(), "client-1");
        assert!(matches!(v.verify("t").await.unwrap_err(), AuthError::IdentityRejected(_)));
        let unchecked = GoogleTokenInfoVerifier::new(&server.uri(), "");
        assert!(unchecked.verify("t").await.is_ok());
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_and_outage_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_token", "bad"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_token"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("id_token", "boom"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let v = GoogleTokenInfoVerifier::new(&server.uri(), "");
        assert!(matches!(v.verify("bad").await.unwrap_err(), AuthError::IdentityRejected(_)));
        assert!(matches!(v.verify("boom").await.unwrap_err(), AuthError::Upstream(_)));
    }

    #[tokio::test]
    async fn static_verifier_knows_only_its_tokens() {
        let v = StaticIdentityVerifier::default().with("tok", "a@b.com", None);
        assert_eq!(v.verify("tok").await.unwrap().email, "a@b.com");
        assert!(v.verify("other").await.is_err());
    }
}
