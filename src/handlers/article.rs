use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::TOP_LIKED_COUNT,
    error::AppError,
    models::article::{ArticleDetail, ArticleListParams, ArticleSummary, CreateArticleRequest},
    utils::{
        html::clean_html,
        jwt::Claims,
        session::{SessionId, SessionStore},
    },
};

const ARTICLE_DETAIL_QUERY: &str = r#"
    SELECT
        a.id, a.user_id, u.username AS author_username, a.title, a.content,
        a.view_count,
        (SELECT COUNT(*) FROM article_likes l WHERE l.article_id = a.id) AS like_count,
        a.created_at, a.updated_at
    FROM articles a
    JOIN users u ON u.id = a.user_id
    WHERE a.id = ?
"#;

/// Create a new article.
/// Requires: Login. Content passes through the HTML sanitizer before storage.
pub async fn create_article(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
    let content = clean_html(&payload.content);

    let article_id: i64 = sqlx::query_scalar(
        "INSERT INTO articles (user_id, title, content) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(&payload.title)
    .bind(&content)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create article: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": article_id })),
    ))
}

/// List articles (recent first).
/// Supports cursor-based pagination; every item carries its aggregated
/// like count.
pub async fn list_articles(
    State(pool): State<SqlitePool>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    // SQLite reads a negative LIMIT as "no limit", so clamp both ends.
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    // created_at is compared as TEXT, so the cursor bound must be rewritten
    // into the stored strftime format first.
    let articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT
            a.id, a.user_id, u.username AS author_username, a.title,
            a.view_count,
            COUNT(l.user_id) AS like_count,
            a.created_at
        FROM articles a
        JOIN users u ON u.id = a.user_id
        LEFT JOIN article_likes l ON l.article_id = a.id
        WHERE (? IS NULL OR a.created_at < strftime('%Y-%m-%dT%H:%M:%fZ', ?))
        GROUP BY a.id
        ORDER BY a.created_at DESC
        LIMIT ?
        "#,
    )
    .bind(params.cursor)
    .bind(params.cursor)
    .bind(limit)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list articles: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(articles))
}

/// Get a single article by ID, counting the view.
///
/// The view counter moves at most once per browsing session per article: the
/// first request from a session increments it, every later request just reads.
/// Always returns the current article state.
pub async fn get_article(
    State(pool): State<SqlitePool>,
    State(sessions): State<SessionStore>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut article = sqlx::query_as::<_, ArticleDetail>(ARTICLE_DETAIL_QUERY)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Article not found".to_string()))?;

    if sessions.first_view(&session.0, id).await {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await?;
        article.view_count += 1;
    }

    Ok(Json(article))
}

/// List the most-liked articles.
///
/// Aggregates like counts across all articles and returns the top 5,
/// descending. Tie order between equal counts is whatever the query engine
/// produces.
pub async fn top_liked_articles(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT
            a.id, a.user_id, u.username AS author_username, a.title,
            a.view_count,
            COUNT(l.user_id) AS like_count,
            a.created_at
        FROM articles a
        JOIN users u ON u.id = a.user_id
        LEFT JOIN article_likes l ON l.article_id = a.id
        GROUP BY a.id
        ORDER BY like_count DESC
        LIMIT ?
        "#,
    )
    .bind(TOP_LIKED_COUNT)
    .fetch_all(&pool)
    .await?;

    Ok(Json(articles))
}
