use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::services::ServeDir;

use crate::handlers::{
    airlines, auth, banks, cities, companies, dadata, extra_services, food, roles, rooms,
    transports, uploads, users,
};
use crate::middleware::auth::auth_middleware;
use crate::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Standard route set shared by every administered resource.
macro_rules! resource_router {
    ($module:ident) => {
        Router::new()
            .route("/", get($module::list).post($module::create))
            .route(
                "/{id}",
                get($module::get)
                    .put($module::update)
                    .delete($module::remove),
            )
            .route("/batch-delete", post($module::batch_remove))
    };
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "message": "Backend is running" }))
}

pub fn create_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();

    // Session issuance; only /me requires a verified token
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/confirm", post(auth::confirm))
        .route(
            "/me",
            get(auth::me)
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let upload_routes = Router::new()
        .route("/transports", post(uploads::transports))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/banks", resource_router!(banks))
        .nest("/api/cities", resource_router!(cities))
        .nest("/api/airlines", resource_router!(airlines))
        .nest("/api/transports", resource_router!(transports))
        .nest("/api/food", resource_router!(food))
        .nest("/api/rooms", resource_router!(rooms))
        .nest("/api/extra-services", resource_router!(extra_services))
        .nest("/api/users", resource_router!(users))
        .nest("/api/companies", resource_router!(companies))
        .nest("/api/roles", resource_router!(roles))
        .nest(
            "/api/dadata",
            Router::new().route("/cities", post(dadata::cities)),
        )
        .nest("/api/uploads", upload_routes)
        .route("/api/health", get(health))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
}
