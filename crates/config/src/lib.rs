//! Layered configuration for syllabus.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`SYLLABUS_` prefix, `__` separates sections),
//!    e.g. `SYLLABUS_CATALOG__DIRECTORY=/srv/courses`
//! 2. A configuration file handed over by the caller
//! 3. The user configuration file (`config.{toml,yaml,yml,json}` inside the
//!    platform config directory for `syllabus`)
//! 4. Built-in defaults
//!
//! ```no_run
//! use syllabus_config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("records live in {}", config.catalog.directory.display());
//! ```

mod catalog;
pub mod error;

pub use crate::catalog::{CatalogConfig, DEFAULT_MAX_RECORD_SIZE};
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "SYLLABUS_";
const USER_CONFIG_STEMS: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Load and validate configuration from every source.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_figment(Self::figment(file)?)
    }

    /// Build the provider chain, including the user configuration file if
    /// one exists. Public so callers can merge providers of their own on top.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        Self::layered(Self::user_config_file(), file)
    }

    /// Extract and validate configuration from an already-built figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Extract)?;
        Ok(Self {
            catalog: config.catalog.validate()?,
        })
    }

    fn layered(user: Option<PathBuf>, file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(user) = user {
            tracing::debug!(path = %user.display(), "Merging user configuration file");
            figment = Self::merge_file(figment, &user)?;
        }
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Merging configuration file");
            figment = Self::merge_file(figment, file)?;
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        let supported = matches!(extension.as_deref(), Some("toml" | "yaml" | "yml" | "json"));
        if !supported {
            exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf()));
        }
        // Figment treats a missing file as an empty source.
        if !path.is_file() {
            exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
        }
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => figment.merge(Yaml::file_exact(path)),
        })
    }

    /// First existing `config.*` file in the platform config directory.
    fn user_config_file() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "syllabus")?;
        USER_CONFIG_STEMS.iter().map(|name| dirs.config_dir().join(name)).find(|path| path.is_file())
    }
}
