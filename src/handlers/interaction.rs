use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, utils::jwt::Claims};

/// Toggle Like on an article.
///
/// Authors cannot like their own articles; that rule lives here, at request
/// time, not in the schema. For everyone else the first call adds the like and
/// the second removes it, so two calls always restore the previous state.
/// Responds with the aggregated like count after the toggle.
pub async fn toggle_like(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(article_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    // 1. Fetch the author to enforce the self-like ban
    let author_id: i64 = sqlx::query_scalar("SELECT user_id FROM articles WHERE id = ?")
        .bind(article_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or(AppError::NotFound("Article not found".to_string()))?;

    if author_id == user_id {
        return Err(AppError::BadRequest(
            "Article authors cannot like their own articles.".to_string(),
        ));
    }

    // 2. Check if already liked
    let existing =
        sqlx::query("SELECT 1 FROM article_likes WHERE user_id = ? AND article_id = ?")
            .bind(user_id)
            .bind(article_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let is_liked = existing.is_some();

    if is_liked {
        // Unlike
        sqlx::query("DELETE FROM article_likes WHERE user_id = ? AND article_id = ?")
            .bind(user_id)
            .bind(article_id)
            .execute(&mut *tx)
            .await?;
    } else {
        // Like
        sqlx::query("INSERT INTO article_likes (user_id, article_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(article_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    // Concurrent request handled gracefully
                    return AppError::Conflict("Already liked".to_string());
                }
                AppError::InternalServerError(e.to_string())
            })?;
    }

    let like_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM article_likes WHERE article_id = ?")
            .bind(article_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    let message = if is_liked { "Like removed" } else { "Like added" };

    Ok(Json(serde_json::json!({
        "article_id": article_id,
        "like_count": like_count,
        "message": message
    })))
}
