use bytes::Bytes;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::images::repo::{self, Image};
use crate::state::AppState;
use crate::users::repo::is_unique_violation;

/// Metadata-only validity check: accepted MIME type and size bound. Pixel
/// data is never decoded.
pub fn is_image_valid(content_type: &str, size: usize, max_bytes: usize) -> bool {
    size > 0 && size <= max_bytes && ext_from_mime(content_type).is_some()
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Upload a profile image for a user. The slot is single-occupancy: an
/// existing image rejects the upload (delete-then-upload to replace). Blob
/// goes in first; a failed metadata insert rolls the blob back so no row can
/// ever reference a missing blob.
pub async fn add_image(
    state: &AppState,
    user_id: Uuid,
    file_name: &str,
    content_type: &str,
    body: Bytes,
) -> Result<Image, ApiError> {
    if repo::find_by_user(&state.db, user_id).await?.is_some() {
        warn!(%user_id, "profile image slot occupied");
        return Err(ApiError::ImageAlreadyExists);
    }

    let image_id = Uuid::new_v4();
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("profile/{}/{}.{}", user_id, image_id, ext);

    state
        .storage
        .put_object(&key, body, content_type)
        .await
        .map_err(ApiError::Internal)?;

    let image = match repo::insert(&state.db, image_id, user_id, file_name, content_type, &key).await
    {
        Ok(image) => image,
        Err(e) => {
            // Metadata failed after the blob landed; remove the blob so the
            // two stores cannot diverge.
            if let Err(cleanup) = state.storage.delete_object(&key).await {
                error!(error = %cleanup, %key, "orphan blob cleanup failed");
            }
            if is_unique_violation(&e) {
                warn!(%user_id, "upload raced, slot taken");
                return Err(ApiError::ImageAlreadyExists);
            }
            return Err(ApiError::from(e));
        }
    };

    info!(%user_id, image_id = %image.id, "profile image uploaded");
    Ok(image)
}

pub async fn get_image(state: &AppState, user_id: Uuid) -> Result<Option<Image>, ApiError> {
    Ok(repo::find_by_user(&state.db, user_id).await?)
}

/// Delete blob then metadata. A failed blob delete aborts the whole
/// operation, leaving the row in place rather than orphaning metadata.
pub async fn delete_image(state: &AppState, image: &Image) -> Result<(), ApiError> {
    state
        .storage
        .delete_object(&image.s3_key)
        .await
        .map_err(ApiError::Internal)?;

    repo::delete(&state.db, image.id).await?;
    info!(user_id = %image.user_id, image_id = %image.id, "profile image deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("text/html"), None);
    }

    #[test]
    fn image_validity_checks_type_and_size() {
        let max = 5 * 1024 * 1024;
        assert!(is_image_valid("image/png", 1024, max));
        assert!(is_image_valid("image/jpeg", max, max));

        assert!(!is_image_valid("image/png", 0, max));
        assert!(!is_image_valid("image/png", max + 1, max));
        assert!(!is_image_valid("application/pdf", 1024, max));
    }

    #[tokio::test]
    async fn fake_storage_put_get_delete_roundtrip() {
        let state = AppState::fake();
        let body = Bytes::from_static(b"\x89PNG fake bytes");

        state
            .storage
            .put_object("profile/u/i.png", body.clone(), "image/png")
            .await
            .unwrap();
        let fetched = state.storage.get_object("profile/u/i.png").await.unwrap();
        assert_eq!(fetched, body);

        state.storage.delete_object("profile/u/i.png").await.unwrap();
        assert!(state.storage.get_object("profile/u/i.png").await.is_err());
    }
}
