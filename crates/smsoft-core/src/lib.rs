//! smsoft-core: configuration resolution and software inventory aggregation
//!
//! Resolves the API key, network ID and ignore list for a run, walks the
//! devices of a Systems Manager network through a [`DeviceSoftwareSource`],
//! and turns the result into a sorted, filtered [`Report`].

pub mod collector;
pub mod config;
pub mod error;
pub mod report;
pub mod source;
pub mod types;

pub use collector::InventoryCollector;
pub use config::{ConfigFile, Defaults, EffectiveConfig, Overrides, Resolver, Setting};
pub use error::{BoxError, ConfigError, InventoryError};
pub use report::{Report, Section};
pub use source::{DeviceSoftwareSource, NoProgress, ProgressObserver};
pub use types::{Device, DeviceSoftware, Inventory, SortMode};
