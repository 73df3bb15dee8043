pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod report;
pub mod utils;
pub mod walker;

pub use batch::run_batch;
pub use error::{ConversionError, Error, OptionsError, PathError, Result};
pub use formats::{destination_path, is_source_image, TargetFormat};
pub use processing::{
    convert, encode_image, fit_within, load_image, process_image_pipeline, resize_to_fit,
    ConversionResult, ConvertOptions, Outcome,
};
pub use report::{format_result_line, RunSummary};
pub use walker::{discover, validate_root, Group, WorkItem};
