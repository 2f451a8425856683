use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use tracing::warn;

use models::JsonDocument;
use service::auth::domain::{Claims, LoginInput, LoginOutput, RegisterInput};

use crate::{errors::ApiError, extract::JsonObject, routes::ServerState};

#[utoipa::path(post, path = "/api/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::TokenResponse), (status = 400, description = "Missing username or password"), (status = 401, description = "Invalid username or password")))]
pub async fn login(State(state): State<ServerState>, JsonObject(body): JsonObject) -> Result<Json<LoginOutput>, ApiError> {
    let input = LoginInput::try_from(body)?;
    Ok(Json(state.auth.login(input).await?))
}

#[utoipa::path(post, path = "/api/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Stored credential document"), (status = 400, description = "Missing username or username already exists")))]
pub async fn register(State(state): State<ServerState>, JsonObject(body): JsonObject) -> Result<Json<JsonDocument>, ApiError> {
    let input = RegisterInput::try_from(body).map_err(|e| {
        warn!(err = %e, "Error decoding request body");
        e
    })?;
    Ok(Json(state.auth.register(input).await?))
}

/// Resolve `Authorization: Bearer <token>` to its claims.
#[utoipa::path(get, path = "/api/me", tag = "auth", responses((status = 200, description = "Token claims", body = crate::openapi::ClaimsResponse), (status = 401, description = "Missing, invalid or expired token")))]
pub async fn me(State(state): State<ServerState>, headers: HeaderMap) -> Result<Json<Claims>, ApiError> {
    let authz = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
    let token = authz
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("invalid Authorization format (expect Bearer)"))?;

    let claims = state.auth.verify_token(token.trim()).map_err(|e| {
        warn!(err = %e, "token validation failed");
        e
    })?;
    Ok(Json(claims))
}
