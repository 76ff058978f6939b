//! Size reporting for subsetting runs.

use std::fmt::Write as _;

/// Result of successfully subsetting one font.
#[derive(Debug, Clone)]
pub struct FontReport {
    /// Font file name.
    pub name: &'static str,
    /// Input file size in bytes.
    pub original_size: u64,
    /// Output file size in bytes.
    pub subset_size: u64,
}

impl FontReport {
    /// Returns the percentage size reduction relative to the original file.
    #[allow(clippy::cast_precision_loss)] // font files are nowhere near 2^52 bytes
    pub fn reduction_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.subset_size as f64 / self.original_size as f64) * 100.0
    }
}

/// Formats a byte count in the human-readable form used in reports
/// (1024-based `B` / `KB` / `MB` / `GB`, one decimal place).
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} GB")
}

/// Renders the end-of-run summary table with aligned columns.
pub fn render_summary(reports: &[FontReport]) -> String {
    let mut out = String::from("Summary:\n");
    out.push_str(&"-".repeat(70));
    out.push('\n');
    for report in reports {
        writeln!(
            out,
            "{:<20} {:>8} -> {:>8}  ({:>5.1}% smaller)",
            report.name,
            format_size(report.original_size),
            format_size(report.subset_size),
            report.reduction_percent()
        )
        .unwrap();
    }
    out
}
