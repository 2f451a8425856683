use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Any JSON object; stored verbatim.
#[derive(ToSchema)]
pub struct PersonDoc { pub name: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

/// Any JSON object that carries a username.
#[derive(ToSchema)]
pub struct RegisterRequest { pub username: String, pub password: Option<String> }

#[derive(ToSchema)]
pub struct TokenResponse { pub token: String }

#[derive(ToSchema)]
pub struct ClaimsResponse { pub username: String, pub exp: i64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::people::list,
        crate::routes::people::create,
        crate::routes::people::update,
        crate::routes::people::delete,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::me,
    ),
    components(
        schemas(
            HealthResponse,
            PersonDoc,
            LoginRequest,
            RegisterRequest,
            TokenResponse,
            ClaimsResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "people"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
