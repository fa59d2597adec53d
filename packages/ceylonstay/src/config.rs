use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    pub firebase_storage_bucket: String,
    pub listings_collection: String,
    pub cache_ttl_secs: u64,
    /// Host phone number for the WhatsApp deep links
    pub contact_phone: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .context("FIREBASE_API_KEY must be set")?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .context("FIREBASE_PROJECT_ID must be set")?,
            firebase_storage_bucket: env::var("FIREBASE_STORAGE_BUCKET")
                .context("FIREBASE_STORAGE_BUCKET must be set")?,
            listings_collection: env::var("LISTINGS_COLLECTION")
                .unwrap_or_else(|_| "ceylonstays".to_string()),
            cache_ttl_secs: env::var("LISTINGS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("LISTINGS_CACHE_TTL_SECS must be a valid number")?,
            contact_phone: env::var("CONTACT_PHONE")
                .unwrap_or_else(|_| "94779598514".to_string()),
        })
    }
}
