use std::{borrow::Cow, collections::HashMap};

use bytes::{Buf, Bytes};
use flate2::read::GzDecoder;
use http::Method;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue, CONTENT_ENCODING, CONTENT_TYPE};
use hyper::{HeaderMap, Request, Response, StatusCode, Uri};
use lp_api::ApiError;
use serde::de::DeserializeOwned;
use std::io::Read;
use tower::Service;
use url::Url;

use super::builder::TimeoutClient;
use crate::error::NodeClientError;

/// Appends a path segment to a URL, tolerating a missing trailing slash.
pub(crate) fn url_join_segment(url: &mut Url, segment: &str) {
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        segments.extend(segment.split('/'));
    }
}

#[derive(Debug)]
pub(crate) struct RequestBuilder<'a> {
    client: &'a TimeoutClient,
    url: Url,
    params: HashMap<Cow<'static, str>, String>,
    headers: HeaderMap,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(client: &'a TimeoutClient, base_url: Url, headers: HeaderMap) -> Self {
        Self { client, url: base_url, params: HashMap::new(), headers }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        url_join_segment(&mut self.url, path);
        self
    }

    #[allow(dead_code)]
    pub fn add_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn add_param(mut self, name: Cow<'static, str>, value: &str) -> Self {
        self.params.insert(name, value.to_string());
        self
    }

    pub fn with_height(self, height: u64) -> Self {
        self.add_param(Cow::from("height"), &height.to_string())
    }

    pub async fn send_get<T>(self) -> Result<T, NodeClientError>
    where
        T: DeserializeOwned,
    {
        unpack_json(self.send_get_raw().await?).await
    }

    pub async fn send_get_bytes(self) -> Result<Bytes, NodeClientError> {
        unpack_bytes(self.send_get_raw().await?).await
    }

    async fn send_get_raw(self) -> Result<Response<Incoming>, NodeClientError> {
        let uri = self.build_uri()?;

        let mut req_builder = Request::builder().method(Method::GET).uri(uri);
        req_builder.headers_mut().expect("Request builder is valid").extend(self.headers);

        let req = req_builder.body(Full::default())?;

        self.client.clone().call(req).await.map_err(NodeClientError::Call)
    }

    /// Sends a gzip-compressed binary body and decodes a JSON response.
    pub async fn send_post<T>(self, body: Bytes) -> Result<T, NodeClientError>
    where
        T: DeserializeOwned,
    {
        unpack_json(self.send_post_raw(body).await?).await
    }

    /// Sends a gzip-compressed binary body and returns the raw response
    /// bytes.
    pub async fn send_post_bytes(self, body: Bytes) -> Result<Bytes, NodeClientError> {
        unpack_bytes(self.send_post_raw(body).await?).await
    }

    async fn send_post_raw(self, body: Bytes) -> Result<Response<Incoming>, NodeClientError> {
        let uri = self.build_uri()?;

        let mut req_builder = Request::builder().method(Method::POST).uri(uri);
        req_builder.headers_mut().expect("Request builder is valid").extend(self.headers);

        let req = req_builder
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_ENCODING, "gzip")
            .body(Full::new(Bytes::from(compress(&body))))?;

        self.client.clone().call(req).await.map_err(NodeClientError::Call)
    }

    fn build_uri(&self) -> Result<Uri, NodeClientError> {
        let mut url = self.url.clone();
        let query: String =
            self.params.iter().map(|(key, value)| format!("{}={}", key, value)).collect::<Vec<String>>().join("&");

        if !query.is_empty() {
            url.set_query(Some(&query));
        }

        let uri: Uri = url.as_str().try_into().map_err(|_| NodeClientError::InvalidUrl(url))?;
        Ok(uri)
    }
}

fn compress(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    // Writing to a Vec cannot fail.
    let _ = encoder.write_all(data);
    encoder.finish().unwrap_or_default()
}

async fn check_status(response: Response<Incoming>) -> Result<(HeaderMap, Bytes), NodeClientError> {
    let http_status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await?.to_bytes();

    if !http_status.is_success() {
        let api_error = serde_json::from_slice::<ApiError>(&body)
            .map_err(|serde_error| NodeClientError::InvalidErrorPayload { http_status, serde_error })?;
        return Err(api_error.into());
    }

    Ok((headers, body))
}

fn decompress_if_gzipped(headers: &HeaderMap, body: Bytes) -> Result<Bytes, NodeClientError> {
    if headers.get(CONTENT_ENCODING).is_some_and(|v| v == "gzip") {
        let mut decoded = Vec::new();
        GzDecoder::new(body.reader()).read_to_end(&mut decoded).map_err(NodeClientError::Decompress)?;
        return Ok(Bytes::from(decoded));
    }
    Ok(body)
}

async fn unpack_json<T>(response: Response<Incoming>) -> Result<T, NodeClientError>
where
    T: DeserializeOwned,
{
    let (headers, body) = check_status(response).await?;
    let body = decompress_if_gzipped(&headers, body)?;
    Ok(serde_json::from_slice(&body)?)
}

async fn unpack_bytes(response: Response<Incoming>) -> Result<Bytes, NodeClientError> {
    let (headers, body) = check_status(response).await?;
    decompress_if_gzipped(&headers, body)
}
