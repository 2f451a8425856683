//! Basic-auth gate for the people routes.
//!
//! One shared admin credential protects every mutation; listing stays public.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use tracing::warn;

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Listing path readable without credentials.
pub const PUBLIC_LIST_PATH: &str = "/api/people";

/// The single statically configured username/password pair.
#[derive(Clone)]
pub struct AdminCredential {
    username: String,
    password: String,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl From<&configs::AuthConfig> for AdminCredential {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self::new(cfg.admin_username.clone(), cfg.admin_password.clone())
    }
}

/// Why a request was turned away; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingHeader,
    WrongScheme,
    BadEncoding,
    Malformed,
    Mismatch,
}

/// GET on the public listing bypasses the gate; everything else needs credentials.
pub fn requires_credentials(method: &Method, path: &str) -> bool {
    !(method == Method::GET && path.starts_with(PUBLIC_LIST_PATH))
}

/// Validate an `Authorization: Basic base64(user:pass)` header against `admin`.
pub fn check_basic(headers: &HeaderMap, admin: &AdminCredential) -> Result<(), Rejection> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(Rejection::MissingHeader)?
        .to_str()
        .map_err(|_| Rejection::Malformed)?;

    let (scheme, encoded) = raw.split_once(' ').ok_or(Rejection::Malformed)?;
    if scheme != "Basic" {
        return Err(Rejection::WrongScheme);
    }

    let decoded = BASE64_STANDARD.decode(encoded).map_err(|_| Rejection::BadEncoding)?;
    let pair = String::from_utf8(decoded).map_err(|_| Rejection::BadEncoding)?;
    let (username, password) = pair.split_once(':').ok_or(Rejection::Malformed)?;

    if admin.matches(username, password) {
        Ok(())
    } else {
        Err(Rejection::Mismatch)
    }
}

/// Middleware: require the admin Basic credential for gated requests.
pub async fn require_basic_auth(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !requires_credentials(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    if let Err(reason) = check_basic(req.headers(), &state.admin) {
        warn!(method = %req.method(), path = %req.uri().path(), ?reason, "basic auth rejected");
        return Err(ApiError::challenge());
    }

    Ok(next.run(req).await)
}
