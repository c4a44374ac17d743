//! Error types for smsoft-core

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error raised by a [`DeviceSoftwareSource`](crate::source::DeviceSoftwareSource)
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors detected while resolving configuration, before any network activity
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key on the command line, in the defaults, or in the environment
    #[error("missing API key: pass --apikey, set a default, or export {var}")]
    MissingCredential {
        /// Environment variable that was consulted last
        var: &'static str,
    },

    /// No network ID on the command line, in the defaults, or in the environment
    #[error("missing network ID: pass --net, set a default, or export {var}")]
    MissingNetworkId {
        /// Environment variable that was consulted last
        var: &'static str,
    },

    /// The ignore list could not be opened or read
    #[error("cannot read ignore file {}: {source}", path.display())]
    IgnoreFileUnreadable {
        /// Path given for the ignore list
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file could not be read or parsed
    #[error("invalid config file {}: {message}", path.display())]
    ConfigFile {
        /// Path of the config file
        path: PathBuf,
        /// What went wrong
        message: String,
    },
}

/// Errors that abort an inventory run
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Listing the devices of the network failed
    #[error("failed to list devices of network {network_id}: {source}")]
    ListDevices {
        /// Network that was queried
        network_id: String,
        /// Error raised by the source
        #[source]
        source: BoxError,
    },

    /// Listing the software of one device failed
    #[error("failed to list software of device {device} ({device_id}): {source}")]
    ListSoftware {
        /// Device display name
        device: String,
        /// Device identifier
        device_id: String,
        /// Error raised by the source
        #[source]
        source: BoxError,
    },
}

impl ConfigError {
    /// Short machine-friendly kind, used in log fields
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::MissingCredential { .. } => "missing_credential",
            ConfigError::MissingNetworkId { .. } => "missing_network_id",
            ConfigError::IgnoreFileUnreadable { .. } => "ignore_file_unreadable",
            ConfigError::ConfigFile { .. } => "config_file",
        }
    }
}
