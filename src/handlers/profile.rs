use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::MAX_HUNSOO_LEVEL,
    error::AppError,
    models::profile::{
        ProfileResponse, PublicProfileResponse, UpdateLevelRequest, UpdateProfileRequest,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Get the current user's profile.
pub async fn get_my_profile(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let profile = fetch_profile(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Update the current user's bio and/or profile image.
/// Only the fields present in the payload are touched.
pub async fn update_my_profile(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    // Check existence
    let _exists: i64 = sqlx::query_scalar("SELECT id FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    // Perform updates sequentially if fields are present
    if let Some(bio) = payload.bio {
        let bio = clean_html(&bio);
        sqlx::query(
            "UPDATE profiles SET bio = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE user_id = ?",
        )
        .bind(&bio)
        .bind(user_id)
        .execute(&pool)
        .await?;
    }

    if let Some(image) = payload.profile_image {
        sqlx::query(
            "UPDATE profiles SET profile_image = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE user_id = ?",
        )
        .bind(&image)
        .bind(user_id)
        .execute(&pool)
        .await?;
    }

    let profile = fetch_profile(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Update the current user's hunsoo level.
/// Levels are non-negative and capped; anything outside the range is a 400.
pub async fn update_hunsoo_level(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateLevelRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.hunsoo_level < 0 || payload.hunsoo_level > MAX_HUNSOO_LEVEL {
        return Err(AppError::BadRequest(format!(
            "hunsoo_level must be between 0 and {}",
            MAX_HUNSOO_LEVEL
        )));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let updated = sqlx::query(
        "UPDATE profiles SET hunsoo_level = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE user_id = ?",
    )
    .bind(payload.hunsoo_level)
    .bind(user_id)
    .execute(&pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }

    let profile = fetch_profile(&pool, user_id)
        .await?
        .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// Get a user's public profile by username.
/// Open to everyone; omits owner-only fields.
pub async fn get_public_profile(
    State(pool): State<SqlitePool>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = sqlx::query_as::<_, PublicProfileResponse>(
        r#"
        SELECT u.username, p.bio, p.hunsoo_level, p.profile_image
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE u.username = ?
        "#,
    )
    .bind(&username)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

async fn fetch_profile(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<ProfileResponse>, sqlx::Error> {
    sqlx::query_as::<_, ProfileResponse>(
        r#"
        SELECT u.username, p.bio, p.hunsoo_level, p.profile_image, p.selected_comment_count
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
