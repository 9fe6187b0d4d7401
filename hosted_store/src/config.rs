use log::*;
use storefront_common::Secret;

const DEFAULT_BUCKET: &str = "images";

#[derive(Debug, Clone, Default)]
pub struct HostedStoreConfig {
    /// Base URL of the project, e.g. `https://abcdefgh.supabase.co`
    pub url: String,
    /// The public API key. Sent as the `apikey` header on every call.
    pub api_key: Secret<String>,
    /// Bearer key for row and storage calls. Writes need a key that is allowed past row-level security.
    pub service_key: Secret<String>,
    /// Object storage bucket for uploaded images.
    pub bucket: String,
}

impl HostedStoreConfig {
    pub fn new_from_env_or_default() -> Self {
        let url = std::env::var("SF_HOSTED_URL").unwrap_or_else(|_| {
            warn!("🪛️ SF_HOSTED_URL not set, using (probably useless) default");
            "http://localhost:54321".to_string()
        });
        let api_key = Secret::new(std::env::var("SF_HOSTED_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ SF_HOSTED_API_KEY not set, using (probably useless) default");
            String::default()
        }));
        let service_key = match std::env::var("SF_HOSTED_SERVICE_KEY") {
            Ok(key) => Secret::new(key),
            Err(_) => {
                info!("🪛️ SF_HOSTED_SERVICE_KEY not set. Row and storage calls will use the public API key.");
                api_key.clone()
            },
        };
        let bucket = std::env::var("SF_STORAGE_BUCKET").unwrap_or_else(|_| {
            debug!("🪛️ SF_STORAGE_BUCKET not set, using '{DEFAULT_BUCKET}'");
            DEFAULT_BUCKET.to_string()
        });
        Self { url: url.trim_end_matches('/').to_string(), api_key, service_key, bucket }
    }
}
