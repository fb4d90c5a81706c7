use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::middleware;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travel_admin_backend::{
    config::Config,
    db,
    entities::{role, status::Status, user},
    handlers::users::hash_password,
    middleware::rate_limit::{create_global_governor, log_request},
    routes,
    utils::pending::PendingRegistrations,
    AppState,
};

/// Pending registrations live this long before the code stops working
const REGISTRATION_TTL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_admin_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations complete");

    // Seed super-admin account if not exists
    seed_super_admin(&db).await;

    // Create app state
    let state = AppState {
        db,
        config: config.clone(),
        http: reqwest::Client::new(),
        pending: Arc::new(PendingRegistrations::new(REGISTRATION_TTL)),
    };

    // CORS: dashboard origins from configuration
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .layer(create_global_governor());

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

/// Seed the super-admin account if it doesn't exist
async fn seed_super_admin(db: &sea_orm::DatabaseConnection) {
    let admin_account = "admin@qaaba.com";

    let existing = user::Entity::find()
        .filter(user::Column::Account.eq(admin_account))
        .one(db)
        .await
        .expect("Failed to check for super-admin");

    if existing.is_none() {
        let super_admin_role = role::Entity::find()
            .filter(role::Column::Code.eq("superadmin"))
            .one(db)
            .await
            .expect("Failed to look up superadmin role");

        let password_hash =
            hash_password("123456").expect("Failed to hash super-admin password");

        let admin = user::ActiveModel {
            full_name: Set("Суперадмин".to_string()),
            account: Set(admin_account.to_string()),
            password_hash: Set(password_hash),
            is_super_admin: Set(true),
            role_id: Set(super_admin_role.map(|r| r.id)),
            status: Set(Status::Active),
            ..Default::default()
        };

        admin.insert(db).await.expect("Failed to create super-admin");
        tracing::info!("Super-admin account created: {}", admin_account);
    }
}
