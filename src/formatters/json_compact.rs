use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::core::DiscoveryReport;

/// JSON rendering of a discovery report.
pub struct JsonCompactFormatter {
    /// Emit only the entrypoint list, without counts or skipped files.
    minimal: bool,
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { minimal: false }
    }

    pub fn with_minimal(mut self, minimal: bool) -> Self {
        self.minimal = minimal;
        self
    }

    pub fn format_to_file(&self, report: &DiscoveryReport, output_path: &Path) -> Result<()> {
        let json_content = self.format_report(report)?;
        fs::write(output_path, json_content)?;
        Ok(())
    }

    pub fn format_report(&self, report: &DiscoveryReport) -> Result<String> {
        let entrypoints: Vec<String> = report
            .entrypoints
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();

        let value = if self.minimal {
            json!(entrypoints)
        } else {
            json!({
                "meta": {
                    "root": report.root.to_string_lossy(),
                    "scanned": report.scanned,
                    "filtered_out": report.filtered_out,
                    "entrypoints": report.entrypoints.len(),
                    "skipped": report.skipped.len(),
                },
                "entrypoints": entrypoints,
                "skipped": report.skipped,
            })
        };

        Ok(serde_json::to_string_pretty(&value)?)
    }
}
