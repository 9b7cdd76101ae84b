use crate::error::GatewayError;
use bytes::{Buf, Bytes};
use flate2::read::GzDecoder;
use http_body_util::{BodyExt, Full};
use hyper::{header, Request, Response, StatusCode};
use lp_api::ApiError;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;

pub(crate) fn not_found_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from_static(b"Not Found")))
        .expect("Failed to build NOT_FOUND response with a valid status and body")
}

pub(crate) fn service_unavailable_response(service_name: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::SERVICE_UNAVAILABLE)
        .body(Full::new(Bytes::from(format!("{} Service disabled", service_name))))
        .expect("Failed to build SERVICE_UNAVAILABLE response with a valid status and body")
}

pub(crate) fn internal_error_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(br#"{"code":"LUM000","message":"Internal server error"}"#)))
        .expect("Failed to build INTERNAL_SERVER_ERROR response with a valid status and body")
}

/// Creates a JSON response with the given status code and a body that can be
/// serialized to JSON.
///
/// If the serialization fails, this function returns a 500 Internal Server
/// Error response.
pub(crate) fn create_json_response<T>(status: StatusCode, body: &T) -> Response<Full<Bytes>>
where
    T: Serialize,
{
    let body = match serde_json::to_vec(body) {
        Ok(body) => body,
        Err(err) => {
            tracing::error!("Failed to serialize response body: {err}");
            return internal_error_response();
        }
    };

    match Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Failed to build response: {err}");
            internal_error_response()
        }
    }
}

/// Creates a gzip-compressed binary response.
pub(crate) fn create_bytes_response(status: StatusCode, body: &[u8]) -> Response<Full<Bytes>> {
    match Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_ENCODING, "gzip")
        .body(Full::new(Bytes::from(gzip(body))))
    {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Failed to build response: {err}");
            internal_error_response()
        }
    }
}

pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    // Writing to a Vec cannot fail.
    let _ = encoder.write_all(data);
    encoder.finish().unwrap_or_default()
}

pub(crate) fn get_params_from_request<B>(req: &Request<B>) -> HashMap<String, String> {
    let query = req.uri().query().unwrap_or("");
    let params = query.split('&');
    let mut query_params = HashMap::new();
    for param in params {
        let parts: Vec<&str> = param.split('=').collect();
        if parts.len() == 2 {
            query_params.insert(parts[0].to_string(), parts[1].to_string());
        }
    }
    query_params
}

pub(crate) fn height_from_params(params: &HashMap<String, String>) -> Result<u64, GatewayError> {
    let height = params
        .get("height")
        .ok_or_else(|| GatewayError::Api(ApiError::bad_request("Field height is required.")))?;
    height
        .parse()
        .map_err(|err: std::num::ParseIntError| GatewayError::Api(ApiError::bad_request(err.to_string())))
}

/// Collects a request body, undoing gzip transport compression when the
/// request declares it.
pub(crate) async fn read_request_body<B>(req: Request<B>) -> Result<Bytes, GatewayError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let gzipped = req.headers().get(header::CONTENT_ENCODING).is_some_and(|v| v == "gzip");
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|err| GatewayError::Internal(format!("reading request body: {err}")))?
        .to_bytes();

    if gzipped {
        let mut decoded = Vec::new();
        GzDecoder::new(body.reader())
            .read_to_end(&mut decoded)
            .map_err(|err| GatewayError::Api(ApiError::bad_request(format!("decompressing request body: {err}"))))?;
        return Ok(Bytes::from(decoded));
    }
    Ok(body)
}

/// Decodes a JSON request body into the expected query/request envelope.
pub(crate) async fn decode_json_body<B, T>(req: Request<B>) -> Result<T, GatewayError>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
    T: serde::de::DeserializeOwned,
{
    let body = read_request_body(req).await?;
    serde_json::from_slice(&body)
        .map_err(|err| GatewayError::Api(ApiError::bad_request(format!("decoding request body: {err}"))))
}
