use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::request::PhotoReference;

/// Object key for a user's profile photo. One photo per user; a new upload replaces it.
pub fn photo_key(user_id: Uuid, photo: &PhotoReference) -> String {
    format!("photos/{}.{}", user_id, photo.extension())
}

/// Decodes the data URI and stores the image bytes. Returns the object key.
pub async fn upload_photo(
    s3: &S3Client,
    bucket: &str,
    user_id: Uuid,
    photo: &PhotoReference,
) -> Result<String, AppError> {
    let bytes = photo
        .decode()
        .map_err(|e| AppError::Validation(format!("Photo payload is not valid base64: {e}")))?;
    let key = photo_key(user_id, photo);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(photo.mime_type())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Photo upload failed: {e}")))?;

    info!("Uploaded profile photo to s3://{}/{}", bucket, key);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_key_uses_user_and_extension() {
        let user_id = Uuid::new_v4();
        let photo = PhotoReference::parse("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(photo_key(user_id, &photo), format!("photos/{user_id}.jpg"));
    }
}
