/// Source matching and target format handling
///
/// Inputs are recognised by extension only. Every target format uses an
/// extension outside the source set, so a destination path can never be
/// the source path.
use crate::constants::SUPPORTED_SOURCE_EXTENSIONS;
use crate::error::OptionsError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Lossy output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    #[default]
    WebP,
    Avif,
}

impl TargetFormat {
    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::WebP => "webp",
            TargetFormat::Avif => "avif",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::WebP => "WebP",
            TargetFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            _ => Err(OptionsError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Check whether a path names a convertible source image (jpg, jpeg, png, any case)
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_SOURCE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Sibling path of `source` carrying the target format's extension
pub fn destination_path(source: &Path, format: TargetFormat) -> PathBuf {
    source.with_extension(format.extension())
}
