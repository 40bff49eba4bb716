use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::{error::TripError, types::CallerIdentity};

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_IMAGE_HEADER: &str = "x-user-image";

/// Reads the caller identity forwarded by the authenticating proxy.
#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = TripError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers).ok_or(TripError::Unauthorized)
    }
}

pub fn identity_from_headers(headers: &HeaderMap) -> Option<CallerIdentity> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let email = header(USER_EMAIL_HEADER)?;
    Some(CallerIdentity {
        email,
        name: header(USER_NAME_HEADER),
        image: header(USER_IMAGE_HEADER),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn email_header_is_required() {
        let mut headers = HeaderMap::new();
        assert!(identity_from_headers(&headers).is_none());

        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("   "));
        assert!(identity_from_headers(&headers).is_none());
    }

    #[test]
    fn optional_profile_headers_are_read() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("ana@example.com"));
        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("Ana"));

        let identity = identity_from_headers(&headers).unwrap();
        assert_eq!(identity.email, "ana@example.com");
        assert_eq!(identity.name.as_deref(), Some("Ana"));
        assert!(identity.image.is_none());
    }
}
