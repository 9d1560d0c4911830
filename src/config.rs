use std::{env, time::Duration};

use thiserror::Error;

use crate::stapi::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub stapi_base_url: String,
    pub stapi_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STAPI_BASE_URL must be an http(s) URL")]
    InvalidBaseUrl,
    #[error("STAPI_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let stapi_base_url =
            non_empty_var("STAPI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(stapi_base_url.starts_with("https://") || stapi_base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl);
        }

        let stapi_timeout = non_empty_var("STAPI_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            stapi_base_url,
            stapi_timeout,
        })
    }
}
