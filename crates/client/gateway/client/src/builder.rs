use crate::error::NodeClientError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::timeout::Timeout;
use url::Url;

type BodyTy = Full<Bytes>;
type HttpsClient = Client<HttpsConnector<HttpConnector>, BodyTy>;
pub(crate) type TimeoutClient = Timeout<HttpsClient>;

/// Connection to another node's gateway.
///
/// Cheap to build; a delegated call typically creates one, issues the single
/// forwarded request and drops it, releasing the connection on every exit
/// path.
#[derive(Clone)]
pub struct NodeProvider {
    pub(crate) client: TimeoutClient,
    pub(crate) headers: HeaderMap,
    pub(crate) base_url: Url,
}

impl std::fmt::Debug for NodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeProvider").field("base_url", &self.base_url).finish()
    }
}

impl NodeProvider {
    pub fn new(base_url: Url) -> Self {
        let connector = HttpsConnector::new();
        let base_client = Client::builder(TokioExecutor::new()).build::<_, BodyTy>(connector);
        let client = Timeout::new(base_client, Duration::from_secs(20));

        Self { client, headers: HeaderMap::new(), base_url }
    }

    /// Attaches a `username:password` access token, sent as basic
    /// credentials with every call.
    pub fn with_access_token(mut self, token: &str) -> Result<Self, NodeClientError> {
        let (username, password) = token.split_once(':').ok_or(NodeClientError::InvalidToken)?;
        if password.contains(':') {
            return Err(NodeClientError::InvalidToken);
        }

        let encoded = BASE64.encode(format!("{username}:{password}"));
        let value = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|_| NodeClientError::InvalidToken)?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[rstest::rstest]
    #[case("no-separator")]
    #[case("a:b:c")]
    fn invalid_access_tokens_are_rejected(#[case] token: &str) {
        let url = Url::parse("http://localhost:1999/").unwrap();
        assert_matches!(NodeProvider::new(url).with_access_token(token), Err(NodeClientError::InvalidToken));
    }

    #[test]
    fn access_tokens_become_basic_credentials() {
        let url = Url::parse("http://localhost:1999/").unwrap();
        let provider = NodeProvider::new(url).with_access_token("alice:s3cret").unwrap();
        let auth = provider.headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert_eq!(auth, format!("Basic {}", BASE64.encode("alice:s3cret")));
    }
}
