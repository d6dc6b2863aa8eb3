//! Custom Axum extractors.
//!
//! - `XhrRequest`: whether the request was issued by `XMLHttpRequest`
//!
//! The session handle extractor lives in [`crate::session`].
//!
//! # Examples
//!
//! ```ignore
//! use todo_lists_web::XhrRequest;
//!
//! async fn destroy(XhrRequest(xhr): XhrRequest) -> Response {
//!     if xhr {
//!         StatusCode::NO_CONTENT.into_response()
//!     } else {
//!         Redirect::to("/lists").into_response()
//!     }
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

/// Header set by browsers' script-issued requests.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Whether the request carries `X-Requested-With: XMLHttpRequest`.
///
/// Script-issued requests get a minimal response (a bare status or the next
/// location as the body) instead of a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XhrRequest(pub bool);

impl XhrRequest {
    /// Inspect request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let xhr = headers
            .get(REQUESTED_WITH_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
        Self(xhr)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for XhrRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use expect
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> XhrRequest {
        let (mut parts, ()) = req.into_parts();
        match XhrRequest::from_request_parts(&mut parts, &()).await {
            Ok(xhr) => xhr,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn test_xhr_header_detected() {
        let req = Request::builder()
            .header(REQUESTED_WITH_HEADER, "XMLHttpRequest")
            .body(())
            .expect("Valid request");

        assert_eq!(extract(req).await, XhrRequest(true));
    }

    #[tokio::test]
    async fn test_missing_header_is_not_xhr() {
        let req = Request::builder().body(()).expect("Valid request");

        assert_eq!(extract(req).await, XhrRequest(false));
    }

    #[tokio::test]
    async fn test_other_header_value_is_not_xhr() {
        let req = Request::builder()
            .header(REQUESTED_WITH_HEADER, "fetch")
            .body(())
            .expect("Valid request");

        assert_eq!(extract(req).await, XhrRequest(false));
    }
}
