//! Image uploads to the third-party media host.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use super::SocialClient;
use crate::errors::{ClientError, INVALID_FILE_TYPE_MESSAGE};
use crate::gateway::ApiRequest;
use crate::models::UploadResponse;

/// MIME types the media host accepts from this client.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Detect an accepted image type from file content (magic bytes).
pub fn detect_image_type(bytes: &[u8]) -> Option<&'static str> {
    let kind = infer::get(bytes)?;
    let mime = kind.mime_type();
    ACCEPTED_IMAGE_TYPES.contains(&mime).then_some(mime)
}

impl SocialClient {
    /// Upload an image file and return its public URL.
    pub async fn upload_image(&self, path: &Path) -> Result<String, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| self.gateway.reject(e.into()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        self.upload_image_bytes(&file_name, bytes).await
    }

    /// Upload image bytes and return their public URL.
    ///
    /// Content that is not JPEG or PNG is rejected before any request is made.
    pub async fn upload_image_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let Some(mime) = detect_image_type(&bytes) else {
            tracing::debug!("Rejected upload of {}: unsupported content", file_name);
            return Err(self.gateway.reject(ClientError::InvalidFileType(
                INVALID_FILE_TYPE_MESSAGE.to_string(),
            )));
        };

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.media_upload_preset.clone())
            .text("cloud_name", self.config.media_cloud_name.clone());

        let response: UploadResponse = self
            .gateway
            .fetch(
                ApiRequest::post(self.config.media_upload_url.clone())
                    .public()
                    .multipart(form),
            )
            .await?;

        tracing::info!("Uploaded {} to {}", file_name, response.url);
        Ok(response.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    #[test]
    fn test_detect_png() {
        assert_eq!(detect_image_type(&PNG_HEADER), Some("image/png"));
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
        assert_eq!(detect_image_type(&jpeg), Some("image/jpeg"));
    }

    #[test]
    fn test_reject_gif_and_text() {
        assert_eq!(detect_image_type(b"GIF89a\x01\x00\x01\x00"), None);
        assert_eq!(detect_image_type(b"just some text"), None);
        assert_eq!(detect_image_type(&[]), None);
    }
}
