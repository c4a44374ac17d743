//! Device/software source and progress observer traits

use async_trait::async_trait;

use crate::types::Device;

/// Where devices and their installed software come from
///
/// Each call yields a finite list that is consumed once.
#[async_trait]
pub trait DeviceSoftwareSource: Send + Sync {
    /// Error raised by the source
    type Error: std::error::Error + Send + Sync + 'static;

    /// List every device of a network
    async fn list_devices(&self, network_id: &str) -> Result<Vec<Device>, Self::Error>;

    /// List the names of the software installed on one device
    async fn list_software(
        &self,
        network_id: &str,
        device_id: &str,
    ) -> Result<Vec<String>, Self::Error>;
}

/// Receives progress while devices are walked
///
/// Purely cosmetic; it never changes what ends up in the report.
pub trait ProgressObserver: Send + Sync {
    /// Enumeration is about to walk `total` devices
    fn started(&self, _total: usize) {}

    /// One device was walked, whether or not it was kept
    fn device_done(&self, _device: &Device) {}

    /// Enumeration completed
    fn finished(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}
