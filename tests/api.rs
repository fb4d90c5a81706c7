use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use rand::Rng;
use sea_orm::{ActiveModelTrait, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use travel_admin_backend::{
    config::Config,
    db,
    entities::{status::Status, user},
    handlers::users::hash_password,
    routes,
    utils::pending::PendingRegistrations,
    AppState,
};

struct TestApp {
    base_url: String,
    db: sea_orm::DatabaseConnection,
}

/// Spin up the full router on an ephemeral port against the database from
/// DATABASE_URL. Tests are skipped when no database is provided.
async fn start_server() -> Option<TestApp> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL missing; skipping api tests");
        return None;
    };

    let config = Config {
        database_url,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        dadata_api_key: None,
        dadata_secret: None,
        dadata_default_countries: vec!["RU".to_string(), "KZ".to_string()],
        upload_dir: "target/test-uploads".to_string(),
    };

    let db = db::connect(&config).await.expect("database connection");
    migration::Migrator::up(&db, None).await.expect("migrations");

    let state = AppState {
        db: db.clone(),
        config,
        http: reqwest::Client::new(),
        pending: Arc::new(PendingRegistrations::new(std::time::Duration::from_secs(300))),
    };

    let app = routes::create_router(state);
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind listener");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Some(TestApp { base_url, db })
}

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, rand::thread_rng().gen_range(0u64..u64::MAX))
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_responds() {
    let Some(app) = start_server().await else { return };

    let res = client()
        .get(format!("{}/api/health", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn duplicate_bic_rejected() {
    let Some(app) = start_server().await else { return };
    let c = client();

    let bic = unique("BIC");
    let payload = json!({ "name": "Halyk", "bic": bic, "status": true });

    let res = c
        .post(format!("{}/api/banks", app.base_url))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let res = c
        .post(format!("{}/api/banks", app.base_url))
        .json(&json!({ "name": "Kaspi", "bic": bic, "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Банк с таким БИК уже существует");
}

#[tokio::test]
async fn missing_city_is_404() {
    let Some(app) = start_server().await else { return };

    let res = client()
        .get(format!("{}/api/cities/999999", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Город не найден");
}

#[tokio::test]
async fn status_flag_localized_in_lists() {
    let Some(app) = start_server().await else { return };
    let c = client();

    let name = unique("Bank");
    let res = c
        .post(format!("{}/api/banks", app.base_url))
        .json(&json!({ "name": name, "bic": unique("B"), "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "active");

    let list: Value = c
        .get(format!("{}/api/banks", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let row = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"].as_i64() == Some(id))
        .expect("created bank in list");
    assert_eq!(row["status"], "Активный");

    // Omitting the flag on update deactivates the record
    let res = c
        .put(format!("{}/api/banks/{}", app.base_url, id))
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["status"], "inactive");
}

#[tokio::test]
async fn transport_photos_fully_replaced() {
    let Some(app) = start_server().await else { return };
    let c = client();

    let res = c
        .post(format!("{}/api/transports", app.base_url))
        .json(&json!({
            "name": unique("Bus"),
            "type": "Межгород",
            "photos": ["/uploads/transports/a.jpg", "/uploads/transports/b.jpg"],
            "status": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["photos"].as_array().unwrap().len(), 2);
    assert_eq!(created["data"]["type"], "Межгород");

    let res = c
        .put(format!("{}/api/transports/{}", app.base_url, id))
        .json(&json!({
            "type": "intercity",
            "photos": ["/uploads/transports/c.jpg"],
            "status": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let detail: Value = c
        .get(format!("{}/api/transports/{}", app.base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        detail["data"]["photos"],
        json!(["/uploads/transports/c.jpg"])
    );
}

#[tokio::test]
async fn short_dadata_query_returns_empty() {
    let Some(app) = start_server().await else { return };

    // One-character query: answered locally, never reaches the upstream
    let res = client()
        .post(format!("{}/api/dadata/cities", app.base_url))
        .json(&json!({ "query": "a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn batch_delete_reports_each_id() {
    let Some(app) = start_server().await else { return };
    let c = client();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let res = c
            .post(format!("{}/api/rooms", app.base_url))
            .json(&json!({ "name": unique("Room"), "status": true }))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let res = c
        .post(format!("{}/api/rooms/batch-delete", app.base_url))
        .json(&json!({ "ids": [ids[0], ids[1], 999999] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let outcomes = body["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["deleted"], true);
    assert_eq!(outcomes[1]["deleted"], true);
    assert_eq!(outcomes[2]["deleted"], false);
    assert_eq!(outcomes[2]["message"], "Комната не найдена");
}

#[tokio::test]
async fn super_admin_cannot_be_deleted() {
    let Some(app) = start_server().await else { return };
    let c = client();

    let admin = user::ActiveModel {
        full_name: Set("Суперадмин".to_string()),
        account: Set(unique("root-") + "@example.com"),
        password_hash: Set(hash_password("123456").unwrap()),
        is_super_admin: Set(true),
        status: Set(Status::Active),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .unwrap();

    let res = c
        .delete(format!("{}/api/users/{}", app.base_url, admin.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Суперадмина нельзя удалить");

    // Batch delete reports the refusal per id instead of failing the call
    let res = c
        .post(format!("{}/api/users/batch-delete", app.base_url))
        .json(&json!({ "ids": [admin.id] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"][0]["deleted"], false);
    assert_eq!(body["data"][0]["message"], "Суперадмина нельзя удалить");
}

#[tokio::test]
async fn login_rejects_unknown_account() {
    let Some(app) = start_server().await else { return };

    let res = client()
        .post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({ "email": unique("ghost") + "@example.com", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Неверный email или пароль");
}

#[tokio::test]
async fn weak_registration_password_reports_rules() {
    let Some(app) = start_server().await else { return };

    let res = client()
        .post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({ "email": unique("new") + "@example.com", "password": "weak" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Пароль не соответствует требованиям");
    assert_eq!(body["validation"]["minLength"], false);
    assert_eq!(body["validation"]["hasLower"], true);
}

#[tokio::test]
async fn me_requires_bearer_token() {
    let Some(app) = start_server().await else { return };

    let res = client()
        .get(format!("{}/api/auth/me", app.base_url))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}
