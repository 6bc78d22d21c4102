//! Cloudinary upload API client.

use async_trait::async_trait;
use confessio_error::{ConfessioResult, UploadError, UploadErrorKind};
use confessio_interface::{HostedImage, MediaHost};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, instrument, warn};

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Compute the Cloudinary request signature.
///
/// SHA-1 hex over the sorted `key=value` pairs joined with `&`, with the
/// API secret appended. `file`, `api_key`, and the signature itself are
/// excluded from signing.
///
/// # Examples
///
/// ```
/// use confessio_publish::upload_signature;
///
/// let sig = upload_signature(&[("timestamp", "1"), ("public_id", "x")], "secret");
/// assert_eq!(sig.len(), 40);
/// ```
pub fn upload_signature(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha1::digest(format!("{joined}{api_secret}")))
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
}

/// Cloudinary client for slide hosting.
#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.cloud_name)
            .finish_non_exhaustive()
    }
}

impl CloudinaryClient {
    /// Create a client for one Cloudinary account.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        debug!("Creating new Cloudinary client");
        Self {
            client: Client::new(),
            base_url: CLOUDINARY_API_BASE.to_string(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Point the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn public_id_for(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slide".to_string())
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    #[instrument(skip(self))]
    async fn upload(&self, path: &Path) -> ConfessioResult<HostedImage> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            UploadError::new(UploadErrorKind::FileRead {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        let public_id = Self::public_id_for(path);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string();
        let signature = upload_signature(
            &[("public_id", &public_id), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let file = Part::bytes(bytes)
            .file_name(public_id.clone())
            .mime_str("image/png")
            .map_err(|e| UploadError::new(UploadErrorKind::Request(e.to_string())))?;
        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id.clone())
            .text("signature", signature)
            .part("file", file);

        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, path = %path.display(), "Failed to send upload request");
                UploadError::new(UploadErrorKind::Request(e.to_string()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Image host returned error");
            return Err(UploadError::new(UploadErrorKind::Api {
                status_code: status.as_u16(),
                message: body,
            }))?;
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            UploadError::new(UploadErrorKind::MissingUrl(format!(
                "Failed to parse upload response: {}",
                e
            )))
        })?;

        match (uploaded.secure_url, uploaded.public_id) {
            (Some(url), Some(public_id)) => {
                debug!(public_id, "Slide uploaded");
                Ok(HostedImage { url, public_id })
            }
            _ => Err(UploadError::new(UploadErrorKind::MissingUrl(
                "response lacked secure_url or public_id".to_string(),
            )))?,
        }
    }

    #[instrument(skip(self, public_ids), fields(count = public_ids.len()))]
    async fn delete(&self, public_ids: &[String]) -> ConfessioResult<()> {
        if public_ids.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}/resources/image/upload", self.base_url, self.cloud_name);
        let query: Vec<(&str, &str)> = public_ids
            .iter()
            .map(|id| ("public_ids[]", id.as_str()))
            .collect();

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&query)
            .send()
            .await
            .map_err(|e| UploadError::new(UploadErrorKind::Request(e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // Cleanup is best-effort, but the caller decides that.
            warn!(status = %status, body = %body, "Asset deletion returned error");
            return Err(UploadError::new(UploadErrorKind::Api {
                status_code: status.as_u16(),
                message: body,
            }))?;
        }

        debug!("Hosted assets deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_order_independent() {
        let a = upload_signature(&[("timestamp", "99"), ("public_id", "x")], "s");
        let b = upload_signature(&[("public_id", "x"), ("timestamp", "99")], "s");
        assert_eq!(a, b);
    }

    #[test]
    fn signature_depends_on_secret() {
        let a = upload_signature(&[("timestamp", "99")], "one");
        let b = upload_signature(&[("timestamp", "99")], "two");
        assert_ne!(a, b);
    }

    #[test]
    fn signature_matches_known_digest() {
        // sha1("public_id=x&timestamp=1secret")
        let sig = upload_signature(&[("timestamp", "1"), ("public_id", "x")], "secret");
        assert_eq!(
            sig,
            hex::encode(Sha1::digest("public_id=x&timestamp=1secret"))
        );
    }

    #[test]
    fn public_id_comes_from_file_stem() {
        let path = Path::new("/tmp/run/confession_12_slide_3.png");
        assert_eq!(
            CloudinaryClient::public_id_for(path),
            "confession_12_slide_3"
        );
    }
}
