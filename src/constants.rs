pub const DEFAULT_IMAGES_ROOT: &str = "images";

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_MAX_HEIGHT: u32 = 1200;

pub const DEFAULT_QUALITY: u8 = 75;
pub const MIN_QUALITY: u8 = 0;
pub const MAX_QUALITY: u8 = 100;

/// ravif speed, 1 (slowest) to 10 (fastest).
pub const AVIF_ENCODE_SPEED: u8 = 6;

pub const SUPPORTED_SOURCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const SUCCESS_PREFIX: &str = "✓";
pub const FAILURE_PREFIX: &str = "✗";
pub const SUMMARY_HEADER: &str = "═══ Summary ═══";

/// Exit status for a run stopped by Ctrl-C (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: u8 = 130;
