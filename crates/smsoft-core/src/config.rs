//! Configuration resolution
//!
//! Every setting is taken from the first place that has it:
//! command line, deployment defaults, then the environment.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::types::SortMode;

/// Environment variable holding the config file path
pub const CONFIG_ENV_VAR: &str = "SMSOFT_CONFIG";

/// Settings that may fall back to the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Dashboard API key
    ApiKey,
    /// Systems Manager network ID
    NetworkId,
}

impl Setting {
    /// Environment variable consulted for this setting
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Setting::ApiKey => "API_KEY",
            Setting::NetworkId => "NET_ID",
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone)]
pub struct Overrides {
    /// `--apikey`
    pub api_key: Option<String>,
    /// `--net`
    pub network_id: Option<String>,
    /// `--pc`
    pub device: Option<String>,
    /// `--ignore`
    pub ignore_file: Option<PathBuf>,
    /// `--quiet`
    pub quiet: bool,
    /// Positional sort mode
    pub sort: SortMode,
}

/// Deployment defaults, consulted after the command line and before the
/// environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Default API key
    pub api_key: Option<String>,
    /// Default network ID
    pub network_id: Option<String>,
    /// Default ignore file
    pub ignore_file: Option<PathBuf>,
}

impl Defaults {
    /// Defaults baked in at build time through `SMSOFT_DEFAULT_API_KEY` and
    /// `SMSOFT_DEFAULT_NET_ID`
    #[must_use]
    pub fn compiled() -> Self {
        Self {
            api_key: option_env!("SMSOFT_DEFAULT_API_KEY").map(str::to_string),
            network_id: option_env!("SMSOFT_DEFAULT_NET_ID").map(str::to_string),
            ignore_file: None,
        }
    }

    /// Overlay `other` on top of `self`; values set in `other` win
    #[must_use]
    pub fn overlay(self, other: Defaults) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            network_id: other.network_id.or(self.network_id),
            ignore_file: other.ignore_file.or(self.ignore_file),
        }
    }

    fn get(&self, setting: Setting) -> Option<&str> {
        match setting {
            Setting::ApiKey => self.api_key.as_deref(),
            Setting::NetworkId => self.network_id.as_deref(),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Clone)]
pub struct EffectiveConfig {
    /// Dashboard API key
    pub credential: String,
    /// Systems Manager network ID
    pub network_id: String,
    /// Application names left out of every report
    pub ignore: BTreeSet<String>,
    /// Only report on the device with exactly this name
    pub target_device: Option<String>,
    /// Suppress narration
    pub quiet: bool,
    /// Report grouping
    pub sort: SortMode,
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("credential", &"<redacted>")
            .field("network_id", &self.network_id)
            .field("ignore", &self.ignore.len())
            .field("target_device", &self.target_device)
            .field("quiet", &self.quiet)
            .field("sort", &self.sort)
            .finish()
    }
}

/// Resolves settings from the command line, defaults, and an environment
/// lookup
pub struct Resolver<F> {
    defaults: Defaults,
    env: F,
}

impl Resolver<fn(&str) -> Option<String>> {
    /// Resolver reading the process environment
    #[must_use]
    pub fn from_process_env(defaults: Defaults) -> Self {
        Self {
            defaults,
            env: process_env,
        }
    }
}

impl<F> Resolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Resolver with a custom environment lookup
    pub fn with_env(defaults: Defaults, env: F) -> Self {
        Self { defaults, env }
    }

    fn lookup(&self, setting: Setting, cli: Option<&str>) -> Option<String> {
        if let Some(value) = non_empty(cli) {
            debug!(?setting, "using command line value");
            return Some(value.to_string());
        }
        if let Some(value) = non_empty(self.defaults.get(setting)) {
            debug!(?setting, "using deployment default");
            return Some(value.to_string());
        }
        let value = (self.env)(setting.env_var()).filter(|v| !v.is_empty());
        if value.is_some() {
            debug!(?setting, var = setting.env_var(), "using environment");
        }
        value
    }

    /// Resolve the API key
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingCredential`] if no source has one.
    pub fn resolve_credential(&self, cli: Option<&str>) -> Result<String, ConfigError> {
        self.lookup(Setting::ApiKey, cli)
            .ok_or(ConfigError::MissingCredential {
                var: Setting::ApiKey.env_var(),
            })
    }

    /// Resolve the network ID
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingNetworkId`] if no source has one.
    pub fn resolve_network_id(&self, cli: Option<&str>) -> Result<String, ConfigError> {
        self.lookup(Setting::NetworkId, cli)
            .ok_or(ConfigError::MissingNetworkId {
                var: Setting::NetworkId.env_var(),
            })
    }

    /// Resolve everything for one run
    ///
    /// # Errors
    /// Returns the first configuration error found, checking the API key,
    /// then the network ID, then the ignore file.
    pub fn resolve(&self, overrides: Overrides) -> Result<EffectiveConfig, ConfigError> {
        let credential = self.resolve_credential(overrides.api_key.as_deref())?;
        let network_id = self.resolve_network_id(overrides.network_id.as_deref())?;
        let ignore_file = overrides
            .ignore_file
            .as_deref()
            .or(self.defaults.ignore_file.as_deref());
        let ignore = load_ignore_set(ignore_file)?;

        Ok(EffectiveConfig {
            credential,
            network_id,
            ignore,
            target_device: overrides.device,
            quiet: overrides.quiet,
            sort: overrides.sort,
        })
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Load the ignore list: one application name per line
///
/// Lines are trimmed and blank lines skipped. No path means an empty set.
///
/// # Errors
/// Returns [`ConfigError::IgnoreFileUnreadable`] if the file cannot be read.
pub fn load_ignore_set(path: Option<&Path>) -> Result<BTreeSet<String>, ConfigError> {
    let Some(path) = path else {
        return Ok(BTreeSet::new());
    };

    let unreadable = |source| ConfigError::IgnoreFileUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(unreadable)?;
    let mut ignore = BTreeSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(unreadable)?;
        let name = line.trim();
        if !name.is_empty() {
            ignore.insert(name.to_string());
        }
    }

    debug!(path = %path.display(), count = ignore.len(), "loaded ignore list");
    Ok(ignore)
}

// ============================================================================
// Config file
// ============================================================================

/// Top-level layout of `smsoft.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Deployment defaults
    #[serde(default)]
    pub defaults: FileDefaults,
}

/// `[defaults]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileDefaults {
    /// Default API key
    pub api_key: Option<String>,
    /// Default network ID
    pub network_id: Option<String>,
    /// Default ignore file
    pub ignore_file: Option<PathBuf>,
    /// Dashboard API base URL
    pub base_url: Option<String>,
}

impl ConfigFile {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from an explicit path, the path in `SMSOFT_CONFIG`, or the
    /// default locations; with none of these present, use an empty config
    ///
    /// # Errors
    /// Returns error if an explicitly named file cannot be read or parsed,
    /// or if a file found at a default location is invalid.
    pub fn load_default(
        explicit: Option<&Path>,
        env_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }

        let paths = [
            Some(PathBuf::from("smsoft.toml")),
            dirs::config_dir().map(|p| p.join("smsoft/smsoft.toml")),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(ConfigFile::default())
    }

    /// Deployment defaults carried by this file
    #[must_use]
    pub fn defaults(&self) -> Defaults {
        Defaults {
            api_key: self.defaults.api_key.clone(),
            network_id: self.defaults.network_id.clone(),
            ignore_file: self.defaults.ignore_file.clone(),
        }
    }
}
