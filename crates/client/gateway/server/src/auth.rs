//! Credential authentication with a lazily-populated token cache.

use crate::error::GatewayError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use dashmap::DashMap;
use hyper::header::{HeaderMap, AUTHORIZATION};
use lp_api::ApiError;
use std::sync::Arc;

/// Validates a credential pair against the node's access-token store.
/// Validation itself (storage, hashing) is external to the gateway.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> anyhow::Result<bool>;
}

/// Authenticates inbound calls.
///
/// Validation results are cached per presented token for the process
/// lifetime; the external verifier is only consulted on first use of a
/// token. Verifier outages fail closed.
pub struct ApiAuthn {
    verifier: Arc<dyn CredentialVerifier>,
    tokens: DashMap<String, bool>,
    disabled: bool,
}

impl ApiAuthn {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, disabled: bool) -> Self {
        Self { verifier, tokens: DashMap::new(), disabled }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        if self.disabled {
            return Ok(());
        }

        let token = basic_token(headers).ok_or(GatewayError::Api(ApiError::unauthenticated()))?;
        if let Some(valid) = self.tokens.get(&token) {
            return if *valid { Ok(()) } else { Err(GatewayError::Api(ApiError::unauthenticated())) };
        }

        let (username, password) =
            token.split_once(':').ok_or(GatewayError::Api(ApiError::unauthenticated()))?;
        let valid = match self.verifier.verify(username, password).await {
            Ok(valid) => valid,
            Err(err) => {
                tracing::error!(target: "gateway_errors", "credential verifier failed: {err:#}");
                return Err(GatewayError::Api(ApiError::unauthenticated()));
            }
        };

        self.tokens.insert(token, valid);
        if valid {
            Ok(())
        } else {
            Err(GatewayError::Api(ApiError::unauthenticated()))
        }
    }
}

/// Extracts the `username:password` token from basic authorization headers.
fn basic_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    String::from_utf8(decoded).ok()
}
