//! Inventory collection: walk the devices of a network and gather their software

use tracing::{debug, info, instrument};

use crate::config::EffectiveConfig;
use crate::error::InventoryError;
use crate::report::Report;
use crate::source::{DeviceSoftwareSource, ProgressObserver};
use crate::types::Inventory;

/// Inventory collector
///
/// Drives a [`DeviceSoftwareSource`] one device at a time. Any source error
/// aborts the walk and the partial inventory is dropped.
pub struct InventoryCollector<S> {
    source: S,
}

impl<S> InventoryCollector<S>
where
    S: DeviceSoftwareSource,
{
    /// Create a new inventory collector
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Collect software for every device of `network_id`
    ///
    /// With `target_device` set, only devices whose name equals it exactly
    /// are queried; the others are skipped without a software lookup.
    ///
    /// # Errors
    /// Returns an error as soon as the source fails to list devices or
    /// software.
    #[instrument(skip(self, observer))]
    pub async fn collect(
        &self,
        network_id: &str,
        target_device: Option<&str>,
        observer: &dyn ProgressObserver,
    ) -> Result<Inventory, InventoryError> {
        let devices = self
            .source
            .list_devices(network_id)
            .await
            .map_err(|e| InventoryError::ListDevices {
                network_id: network_id.to_string(),
                source: Box::new(e),
            })?;

        info!(count = devices.len(), "listed devices");
        observer.started(devices.len());

        let mut inventory = Inventory::new();
        for device in devices {
            if target_device.is_some_and(|target| target != device.name) {
                debug!(device = %device.name, "skipping device");
                observer.device_done(&device);
                continue;
            }

            let software = self
                .source
                .list_software(network_id, &device.id)
                .await
                .map_err(|e| InventoryError::ListSoftware {
                    device: device.name.clone(),
                    device_id: device.id.clone(),
                    source: Box::new(e),
                })?;

            debug!(device = %device.name, entries = software.len(), "listed software");
            observer.device_done(&device);
            inventory.record(device, software);
        }

        observer.finished();
        info!(
            devices = inventory.len(),
            software = inventory.all_software().len(),
            "inventory collection completed"
        );

        Ok(inventory)
    }

    /// Collect the inventory described by `config` and build its report
    ///
    /// # Errors
    /// Returns an error if collection fails; no report is produced then.
    pub async fn run(
        &self,
        config: &EffectiveConfig,
        observer: &dyn ProgressObserver,
    ) -> Result<Report, InventoryError> {
        let inventory = self
            .collect(&config.network_id, config.target_device.as_deref(), observer)
            .await?;
        Ok(Report::build(&inventory, config.sort, &config.ignore))
    }
}
