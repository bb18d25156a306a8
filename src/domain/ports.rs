use crate::domain::model::RatePair;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Something that can produce a fresh EUR/USD rate pair.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> std::result::Result<RatePair, FetchError>;
}

/// String key/value store scoped to one user session.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl SessionStore for Box<dyn SessionStore> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn session_key(&self) -> &str;
    fn session_path(&self) -> Option<&str>;
    fn default_inflation(&self) -> Option<f64>;
}
