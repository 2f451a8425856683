use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

const CHALLENGE: &str = r#"Basic realm="restricted""#;

/// Failure response: a status code with a plain-text message body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    challenge: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), challenge: false }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 401 carrying a `WWW-Authenticate: Basic` challenge.
    pub fn challenge() -> Self {
        Self { challenge: true, ..Self::unauthorized("Unauthorized") }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        }
        let mut resp = (self.status, self.message).into_response();
        if self.challenge {
            resp.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
        }
        resp
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let status = match &e {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unreadable(_) | ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(_) | AuthError::Conflict => Self::bad_request(e.to_string()),
            AuthError::Unauthorized | AuthError::InvalidToken(_) => Self::unauthorized(e.to_string()),
            AuthError::TokenError(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AuthError::Store(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_sets_www_authenticate() {
        let resp = ApiError::challenge().into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], CHALLENGE);
    }

    #[test]
    fn errors_are_plain_text() {
        let resp = ApiError::bad_request("Invalid ID").into_response();
        let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(ct.starts_with("text/plain"), "{ct}");
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("Invalid ID".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("document"), StatusCode::NOT_FOUND),
            (ServiceError::Db("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Unreadable("gone".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(AuthError::Conflict).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
        let store = ApiError::from(AuthError::Store(ServiceError::Db("down".into())));
        assert_eq!(store.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.message, "down");
    }
}
