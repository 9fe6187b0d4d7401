use std::{env, fmt::Display, str::FromStr, time::Duration};

use hosted_store::HostedStoreConfig;
use log::*;
use storefront_common::helpers::parse_list;
use storefront_engine::cache::DEFAULT_CACHE_CAPACITY;

const DEFAULT_SF_HOST: &str = "127.0.0.1";
const DEFAULT_SF_PORT: u16 = 8380;
const DEFAULT_WHATSAPP_NUMBER: &str = "5588992376857";
const DEFAULT_HERO_INTERVAL_SECS: u64 = 5;
const DEFAULT_HERO_FALLBACK_IMAGE: &str = "/assets/hero-banner.jpg";
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Connection details for the hosted data, storage and auth service.
    pub hosted: HostedStoreConfig,
    /// E-mail addresses allowed into the back-office. Empty means nobody.
    pub admin_emails: Vec<String>,
    pub store: StoreSettings,
    /// Capacity of each catalog event channel. Events published to a full channel are dropped.
    pub event_buffer_size: usize,
    /// How many product listings, and how many product pages, the read cache keeps.
    pub cache_capacity: usize,
}

/// Presentation settings handed to the public routes.
#[derive(Clone, Debug)]
pub struct StoreSettings {
    /// The number customers message to buy a product.
    pub whatsapp_number: String,
    pub hero_interval: Duration,
    /// Shown as the only hero slide when there are no active banners.
    pub hero_fallback_image: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            hero_interval: Duration::from_secs(DEFAULT_HERO_INTERVAL_SECS),
            hero_fallback_image: DEFAULT_HERO_FALLBACK_IMAGE.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SF_HOST.to_string(),
            port: DEFAULT_SF_PORT,
            hosted: HostedStoreConfig::default(),
            admin_emails: Vec::new(),
            store: StoreSettings::default(),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SF_HOST").ok().unwrap_or_else(|| DEFAULT_SF_HOST.into());
        let port = env_or_default("SF_PORT", DEFAULT_SF_PORT);
        let hosted = HostedStoreConfig::new_from_env_or_default();
        let admin_emails = env::var("SF_ADMIN_EMAILS").map(|s| parse_list(&s)).unwrap_or_default();
        if admin_emails.is_empty() {
            warn!("🪛️ SF_ADMIN_EMAILS is not set. The back-office will refuse every login.");
        } else {
            info!("🪛️ {} admin(s) configured", admin_emails.len());
        }
        let whatsapp_number = env::var("SF_WHATSAPP_NUMBER").ok().unwrap_or_else(|| {
            debug!("🪛️ SF_WHATSAPP_NUMBER is not set. Using {DEFAULT_WHATSAPP_NUMBER}");
            DEFAULT_WHATSAPP_NUMBER.to_string()
        });
        let interval_secs = env_or_default("SF_HERO_INTERVAL_SECS", DEFAULT_HERO_INTERVAL_SECS);
        let hero_fallback_image =
            env::var("SF_HERO_FALLBACK_IMAGE").ok().unwrap_or_else(|| DEFAULT_HERO_FALLBACK_IMAGE.to_string());
        let event_buffer_size = env_or_default("SF_EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE);
        let cache_capacity = env_or_default("SF_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY);
        Self {
            host,
            port,
            hosted,
            admin_emails,
            store: StoreSettings {
                whatsapp_number,
                hero_interval: Duration::from_secs(interval_secs),
                hero_fallback_image,
            },
            event_buffer_size,
            cache_capacity,
        }
    }
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_or_default(name, env::var(name).ok(), default)
}

/// Parses an environment value, falling back to `default` (with an error in the log) if it is malformed.
fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match value {
        None => default,
        Some(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}
