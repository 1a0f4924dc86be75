use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the photo host
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Photo host returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid photo host API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// An image file read from a multipart form, ready for upload
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A photo stored by the host, addressed by its public URL
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub url: String,
}

/// Client for the external image-hosting service
///
/// The host owns the image lifecycle; callers hold only the returned URL.
/// Failures surface as explicit `PhotoError` results for the controllers to
/// check.
pub struct PhotoClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PhotoClient {
    /// Create a new photo host client
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Upload an image and return its public URL
    pub async fn add_photo(&self, upload: PhotoUpload) -> Result<UploadedPhoto, PhotoError> {
        let url = format!("{}/photos", self.base_url.trim_end_matches('/'));

        tracing::debug!(
            "Uploading photo {} ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(PhotoError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(PhotoError::ApiError(format!(
                "Photo upload failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let photo_url = json
            .get("url")
            .and_then(|u| u.as_str())
            .ok_or_else(|| PhotoError::InvalidResponse("Missing url field".into()))?;

        Ok(UploadedPhoto {
            url: photo_url.to_string(),
        })
    }

    /// Delete a previously uploaded photo by its public URL
    pub async fn delete_photo(&self, image_url: &str) -> Result<(), PhotoError> {
        let encoded = urlencoding::encode(image_url);
        let url = format!(
            "{}/photos?url={}",
            self.base_url.trim_end_matches('/'),
            encoded
        );

        tracing::debug!("Deleting photo: {}", image_url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(PhotoError::Unauthorized);
        }
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PhotoError::NotFound(format!(
                "Photo not found: {}",
                image_url
            )));
        }
        if !response.status().is_success() {
            return Err(PhotoError::ApiError(format!(
                "Photo delete failed: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_client_creation() {
        let client = PhotoClient::new(
            "https://photos.test/api".to_string(),
            "test_key".to_string(),
        );

        assert_eq!(client.base_url, "https://photos.test/api");
        assert_eq!(client.api_key, "test_key");
    }
}
