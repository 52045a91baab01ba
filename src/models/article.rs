use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full article state as returned by the detail endpoint.
///
/// `like_count` is aggregated from the likes relation at query time; there is
/// no stored counter to drift out of sync.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleDetail {
    pub id: i64,
    pub user_id: i64,
    pub author_username: String,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Compact article shape for list and top-liked responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub user_id: i64,
    pub author_username: String,
    pub title: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub content: String,
}

/// Query parameters for listing articles.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    /// Cursor for pagination: the created_at timestamp of the last article in
    /// the previous page.
    pub cursor: Option<chrono::DateTime<chrono::Utc>>,

    /// Number of items to return (default: 20, clamped to 1..=100).
    pub limit: Option<i64>,
}
