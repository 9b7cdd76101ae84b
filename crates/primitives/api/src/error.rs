use hyper::StatusCode;
use serde::{Deserialize, Serialize};

/// Structured error payload returned by every failed API call.
///
/// Errors are data: a failed call still completes with a well-formed
/// response envelope carrying one of these, never a dropped connection.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

mod msg {
    pub(crate) const INTERNAL: &str = "Internal server error";
    pub(crate) const TIMEOUT: &str = "Request timed out";
    pub(crate) const CANCELED: &str = "Request canceled";
    pub(crate) const UNAUTHENTICATED: &str = "Invalid or missing credentials";
    pub(crate) const RATE_LIMITED: &str = "Too many requests";
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), detail: None, data: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() { msg::INTERNAL.to_string() } else { message };
        Self::new(ApiErrorCode::Internal, message)
    }

    pub fn timeout() -> Self {
        Self::new(ApiErrorCode::Timeout, msg::TIMEOUT)
    }

    pub fn canceled() -> Self {
        Self::new(ApiErrorCode::Canceled, msg::CANCELED)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ApiErrorCode::Unauthenticated, msg::UNAUTHENTICATED)
    }

    pub fn rate_limited() -> Self {
        Self::new(ApiErrorCode::RateLimited, msg::RATE_LIMITED)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Unavailable, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub enum ApiErrorCode {
    #[serde(rename = "LUM000")]
    Internal,
    #[serde(rename = "LUM001")]
    Timeout,
    #[serde(rename = "LUM002")]
    Canceled,
    #[serde(rename = "LUM003")]
    BadRequest,
    #[serde(rename = "LUM004")]
    NotFound,
    #[serde(rename = "LUM005")]
    Unauthenticated,
    #[serde(rename = "LUM006")]
    RateLimited,
    #[serde(rename = "LUM007")]
    Unavailable,
}

impl ApiErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Canceled => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_form_is_stable() {
        let err = ApiError::bad_request("timestamp is too large");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "LUM003", "message": "timestamp is too large" }));
    }

    #[test]
    fn round_trips_with_detail_and_data() {
        let err = ApiError::internal("").with_detail("index unavailable").with_data(serde_json::json!({"height": 5}));
        let back: ApiError = serde_json::from_str(&serde_json::to_string(&err).unwrap()).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::rate_limited().http_status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::unauthenticated().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::timeout().http_status(), StatusCode::REQUEST_TIMEOUT);
    }
}
