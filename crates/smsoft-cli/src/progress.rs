//! Progress bar shown while devices are walked

use indicatif::{ProgressBar, ProgressStyle};
use smsoft_core::{Device, ProgressObserver};

/// Progress bar on stderr, hidden in quiet mode
pub struct DeviceProgress {
    bar: ProgressBar,
}

impl DeviceProgress {
    /// Create the progress display; `quiet` hides it entirely
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::with_template(
                "Processing PC [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
            let bar = ProgressBar::new(0);
            bar.set_style(style);
            bar
        };
        Self { bar }
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl ProgressObserver for DeviceProgress {
    fn started(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn device_done(&self, device: &Device) {
        self.bar.set_message(device.name.clone());
        self.bar.inc(1);
    }

    fn finished(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_still_counts() {
        let progress = DeviceProgress::new(true);
        progress.started(2);
        progress.device_done(&Device::new("1", "Bob"));
        assert_eq!(progress.bar.position(), 1);
        assert_eq!(progress.bar.length(), Some(2));
    }
}
