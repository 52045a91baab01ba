// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{article, auth, interaction, profile},
    state::AppState,
    utils::{jwt::auth_middleware, session::session_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, articles, account, public profiles).
/// * Applies global middleware (Session, Trace, CORS).
/// * Injects global state (Database Pool, Config, Session Store).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let article_routes = Router::new()
        .route("/", get(article::list_articles))
        .route("/top", get(article::top_liked_articles))
        .route("/{id}", get(article::get_article))
        // Protected article routes
        .merge(
            Router::new()
                .route("/", post(article::create_article))
                .route("/{id}/like", post(interaction::toggle_like))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let account_routes = Router::new()
        .route(
            "/profile",
            get(profile::get_my_profile).put(profile::update_my_profile),
        )
        .route("/level", put(profile::update_hunsoo_level))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let profile_routes = Router::new().route("/{username}", get(profile::get_public_profile));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/articles", article_routes)
        .nest("/api/account", account_routes)
        .nest("/api/profiles", profile_routes)
        .nest_service("/static", ServeDir::new("static"))
        // Global Middleware (applied from outside in)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
