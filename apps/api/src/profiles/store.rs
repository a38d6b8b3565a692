use aws_sdk_s3::Client as S3Client;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::request::PhotoReference;
use crate::models::profile::{ProfileForm, ProfileRow};
use crate::profiles::photos::upload_photo;
use crate::profiles::validation::validate_profile;

/// What clients get back for a saved profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProfile {
    pub user_id: Uuid,
    pub form_data: ProfileForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_s3_key: Option<String>,
    /// RFC 3339.
    pub updated_at: String,
}

impl TryFrom<ProfileRow> for SavedProfile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let form_data: ProfileForm = serde_json::from_value(row.form_data).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Stored profile for {} does not parse: {e}",
                row.user_id
            ))
        })?;

        Ok(SavedProfile {
            user_id: row.user_id,
            form_data,
            photo_s3_key: row.photo_s3_key,
            updated_at: row.updated_at.to_rfc3339(),
        })
    }
}

/// Upserts the user's form. A later save replaces the form data; the stored photo key is
/// kept unless a new photo is supplied. The photo itself never reaches the database.
pub async fn save_profile(
    pool: &PgPool,
    s3: &S3Client,
    s3_bucket: &str,
    user_id: Uuid,
    form: &ProfileForm,
    photo: Option<&str>,
) -> Result<SavedProfile, AppError> {
    let problems = validate_profile(form);
    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join(" ")));
    }

    let photo = photo
        .map(PhotoReference::parse)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let photo_s3_key = match &photo {
        Some(photo) => Some(upload_photo(s3, s3_bucket, user_id, photo).await?),
        None => None,
    };

    let form_data = serde_json::to_value(form)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles (user_id, form_data, photo_s3_key)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
            SET form_data = EXCLUDED.form_data,
                photo_s3_key = COALESCE(EXCLUDED.photo_s3_key, profiles.photo_s3_key),
                updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&form_data)
    .bind(&photo_s3_key)
    .fetch_one(pool)
    .await?;

    info!("Saved profile for user {user_id}");
    SavedProfile::try_from(row)
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<SavedProfile, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No saved profile for user {user_id}")))?;

    SavedProfile::try_from(row)
}
