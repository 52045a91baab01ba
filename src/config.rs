// src/config.rs

use std::env;

use dotenvy::dotenv;

/// Number of articles returned by the top-liked endpoint.
pub const TOP_LIKED_COUNT: i64 = 5;

/// Hunsoo level assigned to freshly created profiles.
pub const DEFAULT_HUNSOO_LEVEL: i64 = 1;

/// Upper bound for hunsoo levels. The lower bound is 0: levels are
/// non-negative, and negative updates are rejected at request time.
pub const MAX_HUNSOO_LEVEL: i64 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
        }
    }
}
