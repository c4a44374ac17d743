//! Report views over a collected inventory

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::types::{Inventory, SortMode};

/// Header of the single section in `apps` mode
pub const APPS_HEADER: &str = "Apps on systems";

/// Indentation before every data line
const INDENT: &str = "   ";

/// One block of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Narration line printed above the data, if any
    pub header: Option<String>,
    /// Application names, sorted ascending
    pub lines: Vec<String>,
}

/// Sorted, filtered report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Sections in print order
    pub sections: Vec<Section>,
}

impl Report {
    /// Build the report for `mode`, leaving out everything in `ignore`
    #[must_use]
    pub fn build(inventory: &Inventory, mode: SortMode, ignore: &BTreeSet<String>) -> Self {
        let sections = match mode {
            SortMode::Apps => vec![Section {
                header: Some(APPS_HEADER.to_string()),
                lines: inventory.apps(ignore),
            }],
            SortMode::System => inventory
                .by_system(ignore)
                .into_iter()
                .map(|(device, lines)| Section {
                    header: Some(device.name.clone()),
                    lines,
                })
                .collect(),
        };
        Self { sections }
    }

    /// All data lines in print order, without headers
    pub fn data_lines(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
    }

    /// Write the report; headers are dropped when `quiet`
    ///
    /// # Errors
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write>(&self, out: &mut W, quiet: bool) -> io::Result<()> {
        for section in &self.sections {
            if let Some(header) = section.header.as_deref().filter(|_| !quiet) {
                writeln!(out, "{header}")?;
            }
            for line in &section.lines {
                writeln!(out, "{INDENT}{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Device;

    fn render(report: &Report, quiet: bool) -> String {
        let mut out = Vec::new();
        report.write_to(&mut out, quiet).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_apps_output() {
        let mut inventory = Inventory::new();
        inventory.record(Device::new("1", "Alice-PC"), ["Chrome", "Zoom", "Chrome"]);
        let report = Report::build(&inventory, SortMode::Apps, &BTreeSet::new());

        assert_eq!(render(&report, false), "Apps on systems\n   Chrome\n   Zoom\n");
        assert_eq!(render(&report, true), "   Chrome\n   Zoom\n");
    }

    #[test]
    fn test_system_output() {
        let mut inventory = Inventory::new();
        inventory.record(Device::new("2", "Carol"), ["Slack", "Excel"]);
        inventory.record(Device::new("1", "Bob"), ["Slack"]);
        let ignore: BTreeSet<String> = BTreeSet::from(["Slack".to_string()]);
        let report = Report::build(&inventory, SortMode::System, &ignore);

        assert_eq!(render(&report, false), "Bob\nCarol\n   Excel\n");
        assert_eq!(render(&report, true), "   Excel\n");
    }

    #[test]
    fn test_empty_inventory_system_mode() {
        let report = Report::build(&Inventory::new(), SortMode::System, &BTreeSet::new());
        assert!(report.sections.is_empty());
        assert_eq!(render(&report, false), "");
    }
}
