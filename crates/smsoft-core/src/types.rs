//! Inventory type definitions

use std::collections::BTreeSet;

// ============================================================================
// Devices
// ============================================================================

/// A managed endpoint as reported by the device source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Device {
    /// Create a new device
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// Report mode
// ============================================================================

/// How the report is grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// One network-wide list of application names
    Apps,
    /// One section per device
    System,
}

// ============================================================================
// Accumulated inventory
// ============================================================================

/// Software seen on one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSoftware {
    /// The device
    pub device: Device,
    /// Distinct software names installed on it
    pub software: BTreeSet<String>,
}

/// Per-device software plus the network-wide union
///
/// The union always equals the union of every per-device set; both are only
/// grown through [`Inventory::record`].
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    devices: Vec<DeviceSoftware>,
    all_software: BTreeSet<String>,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one device and the software names reported for it
    ///
    /// Names are trimmed; empty names and duplicates are dropped.
    pub fn record<I, S>(&mut self, device: Device, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut software = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if !self.all_software.contains(name) {
                self.all_software.insert(name.to_string());
            }
            software.insert(name.to_string());
        }
        self.devices.push(DeviceSoftware { device, software });
    }

    /// Devices in the order they were recorded
    #[must_use]
    pub fn devices(&self) -> &[DeviceSoftware] {
        &self.devices
    }

    /// Union of all software seen on the network
    #[must_use]
    pub fn all_software(&self) -> &BTreeSet<String> {
        &self.all_software
    }

    /// Number of devices recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Network-wide software minus the ignore set, sorted ascending
    #[must_use]
    pub fn apps(&self, ignore: &BTreeSet<String>) -> Vec<String> {
        without_ignored(&self.all_software, ignore)
    }

    /// Devices sorted by name then id, each with its software minus the
    /// ignore set, sorted ascending
    #[must_use]
    pub fn by_system(&self, ignore: &BTreeSet<String>) -> Vec<(&Device, Vec<String>)> {
        let mut devices: Vec<&DeviceSoftware> = self.devices.iter().collect();
        devices.sort_by(|a, b| {
            a.device
                .name
                .cmp(&b.device.name)
                .then_with(|| a.device.id.cmp(&b.device.id))
        });
        devices
            .into_iter()
            .map(|entry| (&entry.device, without_ignored(&entry.software, ignore)))
            .collect()
    }
}

/// `set - ignore`, in ascending order
#[must_use]
pub fn without_ignored(set: &BTreeSet<String>, ignore: &BTreeSet<String>) -> Vec<String> {
    set.difference(ignore).cloned().collect()
}
