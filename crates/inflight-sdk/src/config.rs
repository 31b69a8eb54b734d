use std::path::{Path, PathBuf};
use std::sync::Arc;

use inflight_naming::NamingKind;
use inflight_store::{FsStorageClient, StorageClient};
use inflight_transfer::RetryConfig;
use inflight_types::{TypeError, DEFAULT_CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inflight::Inflight;

/// Facade configuration, usually loaded from a TOML file.
///
/// ```toml
/// container = "my-bucket"
/// path = "some/path/within"
/// naming = "random"
/// store_root = "/var/lib/inflight"
///
/// [retry]
/// max_attempts = 8
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InflightConfig {
    /// Top-level storage namespace.
    pub container: String,
    /// Prefix every object is grouped under.
    pub path: String,
    /// How object names are derived.
    pub naming: NamingKind,
    /// Content type stamped on every write.
    pub content_type: String,
    /// Root directory of the filesystem backend.
    pub store_root: PathBuf,
    /// Backoff and budget for each operation.
    pub retry: RetryConfig,
}

impl Default for InflightConfig {
    fn default() -> Self {
        Self {
            container: "inflight".into(),
            path: "objects".into(),
            naming: NamingKind::ContentHash,
            content_type: DEFAULT_CONTENT_TYPE.into(),
            store_root: PathBuf::from(".inflight"),
            retry: RetryConfig::default(),
        }
    }
}

impl InflightConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build a facade over `client` from this configuration.
    pub fn build<C: StorageClient>(&self, client: C) -> Result<Inflight<C>, ConfigError> {
        let inflight = Inflight::builder(self.container.as_str(), self.path.as_str(), client)
            .shared_naming(self.naming.strategy())
            .content_type(self.content_type.as_str())
            .retry_policy(self.retry.to_policy()?)
            .build()?;
        Ok(inflight)
    }
}

impl Inflight<Arc<FsStorageClient>> {
    /// Build a filesystem-backed facade rooted at `config.store_root`.
    pub fn from_config(config: &InflightConfig) -> Result<Self, ConfigError> {
        config.build(Arc::new(FsStorageClient::new(&config.store_root)))
    }
}

/// Errors from loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Retry(#[from] inflight_transfer::ConfigError),

    #[error("invalid facade settings: {0}")]
    Facade(#[from] TypeError),
}
