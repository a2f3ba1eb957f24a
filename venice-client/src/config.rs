//! Client configuration

/// Default storage bucket for business and review media.
pub const DEFAULT_STORAGE_BUCKET: &str = "business-media";

/// Configuration for connecting to the directory backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://project.example.co")
    pub base_url: String,

    /// Anonymous API key, sent as `apikey` and as the bearer fallback
    /// when no user session exists
    pub anon_key: String,

    /// Storage bucket for uploaded media
    pub storage_bucket: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            storage_bucket: DEFAULT_STORAGE_BUCKET.to_string(),
            timeout: 30,
        }
    }

    /// Set the storage bucket
    pub fn with_storage_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = bucket.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create the full HTTP gateway from this configuration
    pub fn build_gateway(&self) -> crate::ClientResult<crate::HttpGateway> {
        crate::HttpGateway::new(self)
    }
}
