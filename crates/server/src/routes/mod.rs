use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};
use utoipa::OpenApi;

use common::types::Health;
use service::auth::AuthService;
use service::people::PeopleService;
use service::storage::DocumentStore;

use crate::errors::ApiError;
use crate::gate::{self, AdminCredential};
use crate::openapi::ApiDoc;

pub mod auth;
pub mod people;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub people: PeopleService,
    pub auth: Arc<AuthService>,
    pub admin: AdminCredential,
}

impl ServerState {
    pub fn new(store: Arc<dyn DocumentStore>, cfg: &configs::AuthConfig) -> Self {
        Self {
            people: PeopleService::new(store.clone()),
            auth: Arc::new(AuthService::new(store, cfg.into())),
            admin: cfg.into(),
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse), (status = 503, description = "Database unreachable")))]
pub async fn health(State(state): State<ServerState>) -> Result<Json<Health>, ApiError> {
    state.people.ping().await.map_err(|e| {
        warn!(err = %e, "health check failed");
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    })?;
    Ok(Json(Health::ok()))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router. The basic-auth gate wraps the people
/// routes exactly once; login, register and me are public.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let people_routes = Router::new()
        .route("/api/people", get(people::list).post(people::create))
        .route("/api/people/:id", put(people::update).delete(people::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), gate::require_basic_auth));

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route("/api/me", get(auth::me));

    public
        .merge(people_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
