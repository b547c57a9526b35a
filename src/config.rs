//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Settings shared by every request a [`Session`](crate::Session) makes.
///
/// The defaults talk to the public Kasa cloud endpoint and identify as the
/// Android app, which is what the cloud expects from third-party clients.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use kasa_cloud_rs::ClientConfig;
///
/// let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
/// assert_eq!(config.endpoint, "https://wap.tplinkcloud.com/");
/// assert_eq!(config.timeout, Some(Duration::from_secs(5)));
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub endpoint: String,
    pub app_type: String,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(rename = "timeoutMs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            app_type: Self::DEFAULT_APP_TYPE.to_string(),
            timeout: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://wap.tplinkcloud.com/";
    pub const DEFAULT_APP_TYPE: &'static str = "Kasa_Android";

    pub const ENV_ENDPOINT: &'static str = "KASA_ENDPOINT";
    pub const ENV_APP_TYPE: &'static str = "KASA_APP_TYPE";
    pub const ENV_TIMEOUT_MS: &'static str = "KASA_TIMEOUT_MS";

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the defaults overlaid with `KASA_ENDPOINT`,
    /// `KASA_APP_TYPE` and `KASA_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(Self::ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(app_type) = lookup(Self::ENV_APP_TYPE) {
            config.app_type = app_type;
        }
        if let Some(raw) = lookup(Self::ENV_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} is not a number of milliseconds: {raw}",
                    Self::ENV_TIMEOUT_MS
                ))
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_app_type(mut self, app_type: impl Into<String>) -> Self {
        self.app_type = app_type.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
