use std::path::Path;

use tracing::info;

use super::FlowError;
use crate::api::client::PHOTO_FIELD;
use crate::api::{ApiClient, FilePart};
use crate::models::User;

const PROFILE_LOAD_FAILED: &str = "Could not load profile data.";
const PHOTO_FAILED: &str = "Could not update the photo.";

/// Fallback name when the path has no usable file name
const DEFAULT_PHOTO_NAME: &str = "photo.jpg";

pub async fn load_profile(api: &ApiClient) -> Result<User, FlowError> {
    api.fetch_user()
        .await
        .map_err(|e| FlowError::authenticated(e, PROFILE_LOAD_FAILED))
}

/// MIME type from the file extension: `image/<ext>`, `image/jpeg` without one
pub fn image_mime(file_name: &str) -> String {
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("image/{}", ext.to_lowercase())
        }
        _ => "image/jpeg".to_string(),
    }
}

/// Build the multipart part for a photo already in memory
pub fn photo_part(file_name: &str, bytes: Vec<u8>) -> FilePart {
    let file_name = if file_name.is_empty() { DEFAULT_PHOTO_NAME } else { file_name };
    FilePart::new(PHOTO_FIELD, file_name, image_mime(file_name), bytes)
}

/// Upload a new profile photo from disk and return the refreshed profile.
pub async fn upload_photo(api: &ApiClient, path: &Path) -> Result<User, FlowError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| FlowError::Io {
        message: format!("Could not read {}", path.display()),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_PHOTO_NAME);

    api.upload_profile_photo(photo_part(file_name, bytes))
        .await
        .map_err(|e| FlowError::authenticated(e, PHOTO_FAILED))?;
    info!(file = file_name, "Profile photo updated");

    load_profile(api).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("IMG_001.PNG"), "image/png");
        assert_eq!(image_mime("selfie.jpeg"), "image/jpeg");
        assert_eq!(image_mime("photo"), "image/jpeg");
        assert_eq!(image_mime("weird.j p g"), "image/jpeg");
    }

    #[test]
    fn test_photo_part() {
        let part = photo_part("me.webp", vec![1, 2]);
        assert_eq!(part.field, "photo");
        assert_eq!(part.file_name, "me.webp");
        assert_eq!(part.mime, "image/webp");

        assert_eq!(photo_part("", vec![]).file_name, DEFAULT_PHOTO_NAME);
    }
}
