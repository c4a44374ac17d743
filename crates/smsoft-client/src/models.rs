//! Dashboard API response bodies
//!
//! Only the fields this tool reads are declared; everything else in the
//! payload is ignored.

use serde::Deserialize;
use smsoft_core::Device;

/// A Systems Manager device
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmDevice {
    /// Device identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

impl From<SmDevice> for Device {
    fn from(device: SmDevice) -> Self {
        Device::new(device.id, device.name.unwrap_or_default())
    }
}

/// One software entry installed on a device
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmSoftware {
    /// Application name
    #[serde(default)]
    pub name: Option<String>,
}

/// Error body returned by the Dashboard on failure
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Vec<String>,
}
