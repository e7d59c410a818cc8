//! # Backend HTTP core
//!
//! Every backend call goes through [`HttpCore`]. It owns the `reqwest::Client`
//! and the base URL and unwraps the response envelope shared by all endpoints:
//!
//! ```json
//! { "success": true, "statusCode": 200, "message": "...", "result": { } }
//! ```
//!
//! A call fails with [`ApiError`] when the transport fails, the status is not
//! 2xx, the body does not decode, or the envelope reports `success: false`.
//! The backend's `message` is carried whenever it is present.

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const SESSION_HEADER: &str = "x-session-id";

/// Errors from backend calls.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service error: HTTP {status}: {message}")]
    Service { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The backend's own explanation, when it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Service { message, .. } | ApiError::Rejected(message) if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// The response wrapper used by every endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(self.message));
        }
        self.result
            .ok_or_else(|| ApiError::Parse("response has no result".to_string()))
    }

    /// Like `into_result`, but an absent or `null` result reads as empty.
    fn into_result_or_default(self) -> Result<T, ApiError>
    where
        T: Default,
    {
        if !self.success {
            return Err(ApiError::Rejected(self.message));
        }
        Ok(self.result.unwrap_or_default())
    }
}

/// Shared transport for the typed clients.
#[derive(Debug, Clone)]
pub struct HttpCore {
    client: Client,
    base_url: String,
}

impl HttpCore {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Request to the base URL extended by `segments`, each one
    /// percent-encoded as a single path segment.
    ///
    /// Use this whenever part of the path comes from outside the crate, such
    /// as an order id read from a return URL.
    pub fn request_segments(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(self.client.request(method, url))
    }

    /// Sends the request and returns the envelope's `result`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.envelope::<T>(request).await?.into_result()
    }

    /// Sends the request and returns the envelope's `result`, or the empty
    /// value when a successful envelope carries none.
    pub async fn fetch_or_default<T: DeserializeOwned + Default>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.envelope::<T>(request).await?.into_result_or_default()
    }

    /// Sends the request and only checks the envelope's `success` flag.
    pub async fn acknowledge(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let envelope = self.envelope::<serde_json::Value>(request).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(envelope.message))
        }
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!(%status, bytes = body.len(), "Response received");

        if !status.is_success() {
            // Error bodies usually still carry the envelope's message.
            let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
                .map(|envelope| envelope.message)
                .unwrap_or_default();
            return Err(ApiError::Service {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_envelope_carries_message() {
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(
            r#"{ "success": false, "statusCode": 400, "message": "Cart is empty" }"#,
        )
        .unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err, ApiError::Rejected("Cart is empty".to_string()));
        assert_eq!(err.backend_message(), Some("Cart is empty"));
    }

    #[test]
    fn successful_envelope_without_result_is_a_parse_error() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{ "success": true, "statusCode": 200, "message": "ok" }"#)
                .unwrap();
        assert!(matches!(envelope.into_result(), Err(ApiError::Parse(_))));
    }

    #[test]
    fn missing_list_result_reads_as_empty() {
        for body in [
            r#"{ "success": true, "statusCode": 200, "message": "ok" }"#,
            r#"{ "success": true, "statusCode": 200, "message": "ok", "result": null }"#,
        ] {
            let envelope: ApiEnvelope<Vec<u32>> = serde_json::from_str(body).unwrap();
            assert_eq!(envelope.into_result_or_default(), Ok(Vec::new()));
        }

        let rejected: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{ "success": false, "message": "Order not found" }"#).unwrap();
        assert_eq!(
            rejected.into_result_or_default(),
            Err(ApiError::Rejected("Order not found".to_string()))
        );
    }

    #[test]
    fn path_segments_are_encoded() {
        let core = HttpCore::new("http://localhost:9001/api/v1/");
        let request = core
            .request_segments(Method::GET, &["order", "orderDetails", "../../cart?x=1"])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:9001/api/v1/order/orderDetails/..%2F..%2Fcart%3Fx=1"
        );
    }

    #[test]
    fn unusable_base_url_is_reported() {
        let core = HttpCore::new("not a url");
        assert!(matches!(
            core.request_segments(Method::GET, &["order"]),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn network_errors_have_no_backend_message() {
        assert_eq!(ApiError::Network("refused".into()).backend_message(), None);
        assert_eq!(
            ApiError::Service { status: 500, message: String::new() }.backend_message(),
            None
        );
    }

    #[test]
    fn base_url_is_normalised() {
        let core = HttpCore::new("http://localhost:9001/api/v1/");
        assert_eq!(core.base_url(), "http://localhost:9001/api/v1");
    }
}
