//! Configuration for filetundra
//!
//! Values come from an optional TOML file, then `FILETUNDRA_*` environment
//! variables override them. The indexed root is the only required setting.

mod http;
mod index;
mod logging;

pub use http::HttpConfig;
pub use index::{CrawlConfig, IndexConfig};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "FILETUNDRA_";

const ENV_ROOT: &str = "ROOT";
const ENV_HTTP_ADDRESS: &str = "HTTPADDRESS";
const ENV_HTTP_PORT: &str = "HTTPPORT";
const ENV_INDEX_DIR: &str = "INDEXDIR";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory tree to index and serve
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file without validating it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Build the effective configuration: file (if any), then the process
    /// environment, then an explicit root override, then validation.
    pub fn from_sources(path: Option<&Path>, root: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        if root.is_some() {
            config.root = root;
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply `FILETUNDRA_*` overrides from `vars`; unrelated variables are ignored.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                ENV_ROOT => self.root = Some(PathBuf::from(value)),
                ENV_HTTP_ADDRESS => self.http.address = value,
                ENV_HTTP_PORT => {
                    self.http.port = value
                        .trim()
                        .parse()
                        .with_context(|| format!("Invalid {}{}: '{}'", ENV_PREFIX, ENV_HTTP_PORT, value))?;
                }
                ENV_INDEX_DIR => self.index.dir = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate all configuration fields.
    ///
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        match &self.root {
            None => errors.push(format!(
                "root is required (set it in the config file or via {}{})",
                ENV_PREFIX, ENV_ROOT
            )),
            Some(root) if root.as_os_str().is_empty() => {
                errors.push("root must not be empty".to_string());
            }
            Some(_) => {}
        }

        if self.http.address.trim().is_empty() {
            errors.push("http address must not be empty".to_string());
        }
        if self.http.port == 0 {
            errors.push("http port must be between 1 and 65535".to_string());
        }

        if self.index.writer_heap_bytes < IndexConfig::MIN_WRITER_HEAP_BYTES {
            errors.push(format!(
                "index writer_heap_bytes must be at least {}",
                IndexConfig::MIN_WRITER_HEAP_BYTES
            ));
        }
        if let Some(dir) = &self.index.dir {
            if dir.as_os_str().is_empty() {
                errors.push("index dir must not be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }

    /// Canonical absolute form of the indexed root.
    ///
    /// Fails when the root is unset, missing, or not a directory.
    pub fn root_dir(&self) -> Result<PathBuf> {
        let root = self
            .root
            .as_deref()
            .context("root directory is not configured")?;
        let canonical = std::fs::canonicalize(root)
            .with_context(|| format!("Root directory '{}' is not accessible", root.display()))?;
        if !canonical.is_dir() {
            anyhow::bail!("Root '{}' is not a directory", canonical.display());
        }
        Ok(canonical)
    }
}
