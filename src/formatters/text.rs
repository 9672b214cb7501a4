use anyhow::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::core::DiscoveryReport;

/// One entrypoint path per line, followed by skipped files as comments.
#[derive(Default)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_to_file(&self, report: &DiscoveryReport, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_report(report))?;
        Ok(())
    }

    pub fn format_report(&self, report: &DiscoveryReport) -> String {
        let mut out = String::new();
        for path in &report.entrypoints {
            let _ = writeln!(out, "{}", path.display());
        }
        for skipped in &report.skipped {
            let _ = writeln!(
                out,
                "# skipped {} (syntax error at {}:{})",
                skipped.path.display(),
                skipped.line,
                skipped.column
            );
        }
        out
    }
}
