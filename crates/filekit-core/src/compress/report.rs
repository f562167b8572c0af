//! Size reporting for compressed files.

use serde::{Deserialize, Serialize};

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Before/after sizes of one compressed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl CompressionReport {
    pub fn new(original_bytes: u64, compressed_bytes: u64) -> Self {
        Self {
            original_bytes,
            compressed_bytes,
        }
    }

    /// Bytes saved, 0 when the output grew.
    pub fn saved_bytes(&self) -> u64 {
        self.original_bytes.saturating_sub(self.compressed_bytes)
    }

    /// Percentage saved, clamped at 0 and rounded to one decimal.
    pub fn savings_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        let percent = (self.original_bytes as f64 - self.compressed_bytes as f64)
            / self.original_bytes as f64
            * 100.0;
        round_one_decimal(percent.max(0.0))
    }

    /// One-line summary such as `2.4 MB → 310.5 KB (87.4% saved)`.
    pub fn summary(&self) -> String {
        format!(
            "{} → {} ({}% saved)",
            format_file_size(self.original_bytes),
            format_file_size(self.compressed_bytes),
            self.savings_percent()
        )
    }
}

/// Format a byte count with binary units and at most one decimal.
///
/// Trailing `.0` is dropped, so 1024 bytes is `1 KB` and 1536 is `1.5 KB`.
/// Sizes beyond the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", round_one_decimal(value), UNITS[unit])
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
