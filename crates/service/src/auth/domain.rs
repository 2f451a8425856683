use serde::{Deserialize, Serialize};
use serde_json::Value;

use models::JsonDocument;

use super::errors::AuthError;

/// Login input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Registration input: the whole submitted document, stored verbatim, plus
/// the username pulled out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterInput {
    pub username: String,
    pub document: JsonDocument,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutput {
    pub token: String,
}

fn required_string(body: &JsonDocument, field: &str, missing: &str) -> Result<String, AuthError> {
    match body.get(field) {
        None => Err(AuthError::Validation(missing.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AuthError::Validation(format!("{field} must be a string"))),
    }
}

impl TryFrom<JsonDocument> for LoginInput {
    type Error = AuthError;

    fn try_from(body: JsonDocument) -> Result<Self, Self::Error> {
        let username = required_string(&body, "username", "Username is required")?;
        let password = required_string(&body, "password", "Password is required")?;
        Ok(Self { username, password })
    }
}

impl TryFrom<JsonDocument> for RegisterInput {
    type Error = AuthError;

    fn try_from(document: JsonDocument) -> Result<Self, Self::Error> {
        let username = required_string(&document, "username", "Username is required")?;
        Ok(Self { username, document })
    }
}
