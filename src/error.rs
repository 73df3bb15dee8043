use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The images root could not be used. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Images root not found: {0}")]
    NotFound(PathBuf),

    #[error("Images root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Images root cannot be read: {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A single file failed somewhere between stat and write. The run carries on.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to read {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Failed to write {dest} from {path}: {source}")]
    Write {
        path: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid quality value: {0}. Must be between 0 and 100")]
    InvalidQuality(u8),

    #[error("Invalid bounding box: {0}x{1}. Both dimensions must be at least 1")]
    InvalidBoundingBox(u32, u32),

    #[error("Unsupported target format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Options(#[from] OptionsError),
}

pub type Result<T> = std::result::Result<T, Error>;
