use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

/// The current user's own profile, joined with their username.
#[derive(Debug, Serialize, FromRow)]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub hunsoo_level: i64,
    pub profile_image: Option<String>,
    pub selected_comment_count: i64,
}

/// Public view of another user's profile.
/// Omits `selected_comment_count`, which is only shown to the owner.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicProfileResponse {
    pub username: String,
    pub bio: String,
    pub hunsoo_level: i64,
    pub profile_image: Option<String>,
}

/// DTO for updating the current user's profile. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters."))]
    pub bio: Option<String>,

    #[validate(
        length(min = 1, max = 255),
        custom(function = validate_image_ref)
    )]
    pub profile_image: Option<String>,
}

/// DTO for updating the proficiency level.
/// Bounds are checked in the handler against the configured maximum.
#[derive(Debug, Deserialize)]
pub struct UpdateLevelRequest {
    pub hunsoo_level: i64,
}

/// Validates that an image reference is either an absolute URL or a
/// site-relative path (e.g. "/static/profiles/42.png").
fn validate_image_ref(image: &str) -> Result<(), validator::ValidationError> {
    if image.starts_with('/') {
        return Ok(());
    }
    if Url::parse(image).is_err() {
        return Err(validator::ValidationError::new("invalid_image_ref"));
    }
    Ok(())
}
