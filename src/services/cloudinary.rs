use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{config::CloudinaryConfig, error::GenerationError, services::ImageHost};

/// Signed uploads to a Cloudinary account.
#[derive(Clone, Debug)]
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    http: Client,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload_data_uri(
        &self,
        data_uri: &str,
        folder: &str,
    ) -> Result<String, GenerationError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [("folder", folder), ("timestamp", timestamp.as_str())];
        let signature = sign_params(&signed, &self.config.api_secret);

        let form = [
            ("file", data_uri),
            ("folder", folder),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self
            .http
            .post(self.upload_url())
            .form(&form)
            .send()
            .await
            .map_err(|err| GenerationError::TransportFailure(format!("upload failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::TransportFailure(format!(
                "upload returned HTTP {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|err| {
            GenerationError::InvalidResponse(format!("upload response was not JSON: {err}"))
        })?;

        let url = body
            .get("secure_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("upload response had no secure_url".to_string())
            })?;

        info!(%url, "image uploaded");
        Ok(url)
    }
}

/// Cloudinary request signature: sorted `key=value` pairs joined by `&`,
/// followed by the API secret, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
