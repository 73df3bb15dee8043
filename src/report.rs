use crate::constants::{FAILURE_PREFIX, SUCCESS_PREFIX, SUMMARY_HEADER};
use crate::processing::{ConversionResult, Outcome};
use crate::utils::{calculate_savings_percent, format_file_size};
use std::fmt;

/// Running totals for one batch. Size totals only count successful files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_succeeded: usize,
    pub files_failed: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &ConversionResult) {
        match result.outcome {
            Outcome::Success {
                original_bytes,
                compressed_bytes,
            } => {
                self.files_succeeded += 1;
                self.total_original_bytes += original_bytes;
                self.total_compressed_bytes += compressed_bytes;
            }
            Outcome::Failure { .. } => {
                self.files_failed += 1;
            }
        }
    }

    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ConversionResult>,
    {
        results.into_iter().fold(Self::new(), |mut summary, result| {
            summary.record(result);
            summary
        })
    }

    /// Negative when the outputs outweigh the inputs.
    pub fn bytes_saved(&self) -> i128 {
        i128::from(self.total_original_bytes) - i128::from(self.total_compressed_bytes)
    }

    /// Overall saving from the totals, not an average of per-file figures.
    pub fn savings_percent(&self) -> f64 {
        calculate_savings_percent(self.total_original_bytes, self.total_compressed_bytes)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", SUMMARY_HEADER)?;
        writeln!(f, "Files: {}", self.files_succeeded)?;
        if self.files_failed > 0 {
            writeln!(f, "Failed: {}", self.files_failed)?;
        }
        writeln!(f, "Original: {}", format_file_size(self.total_original_bytes))?;
        writeln!(
            f,
            "Compressed: {}",
            format_file_size(self.total_compressed_bytes)
        )?;
        write!(
            f,
            "Saved: {} ({:.1}%)",
            format_signed_size(self.bytes_saved()),
            self.savings_percent()
        )?;
        if self.interrupted {
            write!(f, "\nInterrupted: remaining files were not processed")?;
        }
        Ok(())
    }
}

fn format_signed_size(bytes: i128) -> String {
    let magnitude = u64::try_from(bytes.unsigned_abs()).unwrap_or(u64::MAX);
    if bytes < 0 {
        format!("-{}", format_file_size(magnitude))
    } else {
        format_file_size(magnitude)
    }
}

/// One progress line per processed file.
///
/// `✓ gallery/a.jpg → a.webp (1.2 MB → 84.0 KB, -93.2%)` or
/// `✗ Failed: gallery/b.jpg - <reason>`.
pub fn format_result_line(result: &ConversionResult) -> String {
    let label = result.item.label();
    match &result.outcome {
        Outcome::Success {
            original_bytes,
            compressed_bytes,
        } => {
            let percent = calculate_savings_percent(*original_bytes, *compressed_bytes);
            let change = if percent >= 0.0 {
                format!("-{:.1}%", percent)
            } else {
                format!("+{:.1}%", percent.abs())
            };
            format!(
                "{} {} → {} ({} → {}, {})",
                SUCCESS_PREFIX,
                label,
                result.item.output_name(),
                format_file_size(*original_bytes),
                format_file_size(*compressed_bytes),
                change
            )
        }
        Outcome::Failure { error } => {
            format!("{} Failed: {} - {}", FAILURE_PREFIX, label, error)
        }
    }
}
