//! Object storage client
//!
//! Uploads media and hands back public URLs. Object names are
//! namespaced by entity kind and owning ID so uploads never collide.

use crate::rest::{RestClient, TokenSlot};
use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use uuid::Uuid;

/// Client for the backend object storage interface
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
    token: TokenSlot,
}

impl StorageClient {
    pub fn new(config: &ClientConfig, client: Client, token: TokenSlot) -> Self {
        Self {
            client,
            base_url: format!("{}/storage/v1", config.base_url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
            bucket: config.storage_bucket.clone(),
            token,
        }
    }

    /// Build the namespaced object path for an upload:
    /// `{folder}/{uuid}-{sanitized-name}`.
    pub fn object_path(folder: &str, file_name: &str) -> String {
        format!(
            "{}/{}-{}",
            folder.trim_matches('/'),
            Uuid::new_v4(),
            shared::util::sanitize_object_name(file_name)
        )
    }

    /// Public URL for an already-stored object
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }

    /// Upload bytes and return the public URL
    pub async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        let operation = "upload_asset";
        let path = Self::object_path(folder, file_name);
        let content_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string();
        let bearer = {
            let token = self.token.read().await;
            token.clone().unwrap_or_else(|| self.anon_key.clone())
        };
        tracing::debug!(%path, %content_type, "uploading asset");
        let response = self
            .client
            .post(format!("{}/object/{}/{}", self.base_url, self.bucket, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
            .body(bytes)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(operation, e))?;
        RestClient::check_status(operation, response).await?;
        Ok(self.public_url(&path))
    }
}
