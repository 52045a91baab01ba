// tests/profile_tests.rs

use hunsoo_backend::{config::Config, routes, state::AppState, utils::session::SessionStore};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_app() -> (String, SqlitePool) {
    // Single-connection in-memory pool: the database lives and dies with the
    // connection, so it must never be recycled.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "profile_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        sessions: SessionStore::new(),
    };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, pool)
}

/// Registers a user and returns a Bearer token for them.
async fn register_and_login(client: &reqwest::Client, address: &str, username: &str) -> String {
    let password = "password123";

    client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .unwrap();

    let login = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({"username": username, "password": password}))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();

    login["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn registration_creates_default_profile() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "newbie").await;

    let response = client
        .get(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["username"], "newbie");
    assert_eq!(profile["bio"], "");
    assert_eq!(profile["hunsoo_level"], 1);
    assert_eq!(profile["selected_comment_count"], 0);
    assert!(profile["profile_image"].is_null());
}

#[tokio::test]
async fn get_profile_requires_auth() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/account/profile", address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn update_bio_persists() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "scribe").await;

    let response = client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"bio": "I write about old buildings."}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["bio"], "I write about old buildings.");

    // And it survives a re-read
    let fetched: serde_json::Value = client
        .get(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["bio"], "I write about old buildings.");
}

#[tokio::test]
async fn update_bio_strips_scripts() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "scribe").await;

    let response = client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"bio": "<script>alert(1)</script>hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["bio"], "hello");
}

#[tokio::test]
async fn update_profile_image_accepts_url_and_path() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "poser").await;

    let response = client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"profile_image": "/static/profiles/a.png"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["profile_image"], "/static/profiles/a.png");

    let response = client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"profile_image": "https://cdn.example.com/a.png"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn update_profile_image_rejects_garbage() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "poser").await;

    let response = client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"profile_image": "not a url"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_hunsoo_level_success() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "climber").await;

    let response = client
        .put(&format!("{}/api/account/level", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"hunsoo_level": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["hunsoo_level"], 3);

    let fetched: serde_json::Value = client
        .get(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["hunsoo_level"], 3);
}

#[tokio::test]
async fn update_hunsoo_level_rejects_negative() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "climber").await;

    let response = client
        .put(&format!("{}/api/account/level", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"hunsoo_level": -1}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    // Level is unchanged after the rejected update
    let fetched: serde_json::Value = client
        .get(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["hunsoo_level"], 1);
}

#[tokio::test]
async fn update_hunsoo_level_rejects_above_max() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "climber").await;

    let response = client
        .put(&format!("{}/api/account/level", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"hunsoo_level": 101}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn update_hunsoo_level_requires_auth() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .put(&format!("{}/api/account/level", address))
        .json(&serde_json::json!({"hunsoo_level": 3}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn public_profile_by_username() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address, "visible").await;

    client
        .put(&format!("{}/api/account/profile", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({"bio": "Out in the open."}))
        .send()
        .await
        .unwrap();

    // No auth header: the lookup is public
    let response = client
        .get(&format!("{}/api/profiles/visible", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["username"], "visible");
    assert_eq!(profile["bio"], "Out in the open.");
    assert_eq!(profile["hunsoo_level"], 1);
    assert!(profile.get("selected_comment_count").is_none());
}

#[tokio::test]
async fn public_profile_unknown_username_returns_404() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/profiles/nobody_here", address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}
