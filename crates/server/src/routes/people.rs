use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use models::JsonDocument;

use crate::{errors::ApiError, extract::JsonObject, routes::ServerState};

#[utoipa::path(get, path = "/api/people", tag = "people", responses((status = 200, description = "All documents"), (status = 500, description = "Store error")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<JsonDocument>>, ApiError> {
    let docs = state.people.list().await?;
    info!(count = docs.len(), "list people");
    Ok(Json(docs))
}

#[utoipa::path(
    post, path = "/api/people", tag = "people",
    request_body = crate::openapi::PersonDoc,
    responses(
        (status = 200, description = "Created document with its _id"),
        (status = 400, description = "Body is not a JSON object"),
        (status = 401, description = "Missing or wrong admin credential"),
        (status = 500, description = "Store error")
    )
)]
pub async fn create(State(state): State<ServerState>, JsonObject(body): JsonObject) -> Result<Json<JsonDocument>, ApiError> {
    Ok(Json(state.people.create(body).await?))
}

#[utoipa::path(
    put, path = "/api/people/{id}", tag = "people",
    params(("id" = String, Path, description = "24-hex document id")),
    request_body = crate::openapi::PersonDoc,
    responses(
        (status = 200, description = "Merged document"),
        (status = 400, description = "Invalid ID or body"),
        (status = 401, description = "Missing or wrong admin credential"),
        (status = 404, description = "No document with this id"),
        (status = 500, description = "Store error")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonObject(body): JsonObject,
) -> Result<Json<JsonDocument>, ApiError> {
    Ok(Json(state.people.update(&id, body).await?))
}

#[utoipa::path(
    delete, path = "/api/people/{id}", tag = "people",
    params(("id" = String, Path, description = "24-hex document id")),
    responses(
        (status = 200, description = "Deleted count (0 or 1)", body = u64),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Missing or wrong admin credential"),
        (status = 500, description = "Store error")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<u64>, ApiError> {
    Ok(Json(state.people.delete(&id).await?))
}
