//! Raw request path access
//!
//! Route parameters are handed to the payload builders still percent-encoded
//! so that decoding failures surface as `MalformedParameter` for the field
//! that caused them.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Path segments and query string exactly as they appeared on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    segments: Vec<String>,
    query: Option<String>,
}

impl EncodedRequest {
    pub fn from_uri(path: &str, query: Option<&str>) -> Self {
        Self {
            segments: path
                .trim_start_matches('/')
                .split('/')
                .map(str::to_string)
                .collect(),
            query: query.map(str::to_string),
        }
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// First value of query parameter `name`, still encoded
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for EncodedRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_uri(parts.uri.path(), parts.uri.query()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_stay_encoded() {
        let request = EncodedRequest::from_uri(
            "/api/get/transaction/devhub/Fund%20X/a%2Fb",
            Some("linkedRfp=rfp%2D12.near&x=1"),
        );

        assert_eq!(request.segment(3), Some("devhub"));
        assert_eq!(request.segment(4), Some("Fund%20X"));
        assert_eq!(request.segment(5), Some("a%2Fb"));
        assert_eq!(request.query_param("linkedRfp"), Some("rfp%2D12.near"));
        assert_eq!(request.query_param("missing"), None);
        assert_eq!(request.segment(6), None);
    }

    #[test]
    fn test_flag_query_param() {
        let request = EncodedRequest::from_uri("/api/view/a/b", Some("args"));
        assert_eq!(request.query_param("args"), Some(""));
    }
}
