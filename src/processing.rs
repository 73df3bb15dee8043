use crate::constants::{
    AVIF_ENCODE_SPEED, DEFAULT_IMAGES_ROOT, DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH,
    DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{ConversionError, OptionsError};
use crate::formats::TargetFormat;
use crate::verbose;
use crate::walker::WorkItem;
use image::codecs::avif::AvifEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run needs to know, validated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub images_root: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
    pub target_format: TargetFormat,
}

impl ConvertOptions {
    pub fn new(
        images_root: Option<PathBuf>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        quality: Option<u8>,
        target_format: Option<TargetFormat>,
    ) -> Result<Self, OptionsError> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(OptionsError::InvalidQuality(quality));
        }

        let max_width = max_width.unwrap_or(DEFAULT_MAX_WIDTH);
        let max_height = max_height.unwrap_or(DEFAULT_MAX_HEIGHT);
        if max_width == 0 || max_height == 0 {
            return Err(OptionsError::InvalidBoundingBox(max_width, max_height));
        }

        Ok(Self {
            images_root: images_root.unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_ROOT)),
            max_width,
            max_height,
            quality,
            target_format: target_format.unwrap_or_default(),
        })
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            images_root: PathBuf::from(DEFAULT_IMAGES_ROOT),
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            target_format: TargetFormat::default(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Success {
        original_bytes: u64,
        compressed_bytes: u64,
    },
    Failure {
        error: ConversionError,
    },
}

/// What happened to one work item.
#[derive(Debug)]
pub struct ConversionResult {
    pub item: WorkItem,
    pub outcome: Outcome,
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}

/// Converts one item. Every failure is folded into `Outcome::Failure`, so a
/// bad file never stops the caller's loop.
pub fn convert(item: WorkItem, options: &ConvertOptions) -> ConversionResult {
    let outcome = match process_image_pipeline(&item, options) {
        Ok((original_bytes, compressed_bytes)) => Outcome::Success {
            original_bytes,
            compressed_bytes,
        },
        Err(error) => Outcome::Failure { error },
    };

    ConversionResult { item, outcome }
}

/// stat -> decode -> resize -> encode -> write -> stat
///
/// # Returns
/// * `Ok((original_size, compressed_size))` - File sizes in bytes
/// * `Err(ConversionError)` - The first step that failed, tagged with the source path
pub fn process_image_pipeline(
    item: &WorkItem,
    options: &ConvertOptions,
) -> Result<(u64, u64), ConversionError> {
    let original_size = fs::metadata(&item.source)
        .map_err(|source| ConversionError::Stat {
            path: item.source.clone(),
            source,
        })?
        .len();

    let mut img = load_image(&item.source)?;
    resize_to_fit(&mut img, options);

    let encoded = encode_image(&img, options.target_format, options.quality).map_err(
        |message| ConversionError::Encode {
            path: item.source.clone(),
            message,
        },
    )?;

    let write_error = |source| ConversionError::Write {
        path: item.source.clone(),
        dest: item.dest.clone(),
        source,
    };
    fs::write(&item.dest, &encoded).map_err(write_error)?;
    let compressed_size = fs::metadata(&item.dest).map_err(write_error)?.len();

    Ok((original_size, compressed_size))
}

/// Decodes by content sniffing, so a PNG saved as `.jpg` still loads.
pub fn load_image(path: &Path) -> Result<DynamicImage, ConversionError> {
    let stat_error = |source| ConversionError::Stat {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(stat_error)?
        .with_guessed_format()
        .map_err(stat_error)?
        .decode()
        .map_err(|source| ConversionError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Largest size with the same aspect ratio that fits inside
/// `max_width` x `max_height`. Never enlarges; never returns a zero side.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (mw, mh) = (u64::from(max_width), u64::from(max_height));

    // w / mw >= h / mh, cross-multiplied
    if w * mh >= h * mw {
        let scaled = ((h * mw + w / 2) / w).clamp(1, mh);
        (max_width, scaled as u32)
    } else {
        let scaled = ((w * mh + h / 2) / h).clamp(1, mw);
        (scaled as u32, max_height)
    }
}

pub fn resize_to_fit(img: &mut DynamicImage, options: &ConvertOptions) {
    let (width, height) = img.dimensions();
    let (target_width, target_height) =
        fit_within(width, height, options.max_width, options.max_height);

    if (target_width, target_height) != (width, height) {
        verbose!(
            "Resizing {}x{} -> {}x{}",
            width,
            height,
            target_width,
            target_height
        );
        *img = img.resize_exact(target_width, target_height, FilterType::Lanczos3);
    }
}

/// Encodes to the target format in memory. Errors are codec diagnostics.
pub fn encode_image(
    img: &DynamicImage,
    format: TargetFormat,
    quality: u8,
) -> Result<Vec<u8>, String> {
    match format {
        TargetFormat::WebP => encode_webp(img, quality),
        TargetFormat::Avif => encode_avif(img, quality),
    }
}

fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let (width, height) = img.dimensions();
    let quality = f32::from(quality);

    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| format!("WebP encoder error: {:?}", e))
}

fn encode_avif(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, String> {
    let mut buffer = Vec::new();
    let encoder = AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_ENCODE_SPEED, quality);
    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_with_encoder(encoder)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::Group;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_gradient(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        img.save(path).unwrap();
    }

    fn item_for(source: PathBuf) -> WorkItem {
        WorkItem::new(Group::Root, source, TargetFormat::WebP)
    }

    #[test]
    fn test_convert_options_default() {
        let options = ConvertOptions::new(None, None, None, None, None).unwrap();
        assert_eq!(options, ConvertOptions::default());
        assert_eq!(options.quality, 75);
        assert_eq!(options.max_width, 800);
        assert_eq!(options.max_height, 1200);
        assert_eq!(options.target_format, TargetFormat::WebP);
        assert_eq!(options.images_root, PathBuf::from("images"));
    }

    #[test]
    fn test_convert_options_custom() {
        let options = ConvertOptions::new(
            Some(PathBuf::from("site/img")),
            Some(640),
            Some(480),
            Some(0),
            Some(TargetFormat::Avif),
        )
        .unwrap();
        assert_eq!(options.images_root, PathBuf::from("site/img"));
        assert_eq!((options.max_width, options.max_height), (640, 480));
        assert_eq!(options.quality, 0);
        assert_eq!(options.target_format, TargetFormat::Avif);
    }

    #[test]
    fn test_convert_options_invalid_quality() {
        let result = ConvertOptions::new(None, None, None, Some(101), None);
        assert!(matches!(result, Err(OptionsError::InvalidQuality(101))));
    }

    #[test]
    fn test_convert_options_invalid_box() {
        let result = ConvertOptions::new(None, Some(0), None, None, None);
        assert!(matches!(
            result,
            Err(OptionsError::InvalidBoundingBox(0, 1200))
        ));

        let result = ConvertOptions::new(None, None, Some(0), None, None);
        assert!(matches!(
            result,
            Err(OptionsError::InvalidBoundingBox(800, 0))
        ));
    }

    #[test]
    fn test_fit_within_no_upscale() {
        assert_eq!(fit_within(400, 300, 800, 1200), (400, 300));
        assert_eq!(fit_within(800, 1200, 800, 1200), (800, 1200));
    }

    #[test]
    fn test_fit_within_width_bound() {
        assert_eq!(fit_within(1600, 1200, 800, 1200), (800, 600));
        assert_eq!(fit_within(4000, 1000, 800, 1200), (800, 200));
    }

    #[test]
    fn test_fit_within_height_bound() {
        assert_eq!(fit_within(1000, 3000, 800, 1200), (400, 1200));
        assert_eq!(fit_within(600, 2400, 800, 1200), (300, 1200));
    }

    #[test]
    fn test_fit_within_rounds_to_nearest() {
        // 1000x333 at width 800 -> 266.4
        assert_eq!(fit_within(1000, 333, 800, 1200), (800, 266));
        // 1000x334 at width 800 -> 267.2
        assert_eq!(fit_within(1000, 334, 800, 1200), (800, 267));
    }

    #[test]
    fn test_fit_within_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(100_000, 1, 800, 1200), (800, 1));
        assert_eq!(fit_within(1, 100_000, 800, 1200), (1, 1200));
    }

    #[test]
    fn test_resize_to_fit_downscales() {
        let mut img = DynamicImage::new_rgb8(1600, 1200);
        resize_to_fit(&mut img, &ConvertOptions::default());
        assert_eq!(img.dimensions(), (800, 600));
    }

    #[test]
    fn test_resize_to_fit_leaves_small_images() {
        let mut img = DynamicImage::new_rgb8(400, 300);
        resize_to_fit(&mut img, &ConvertOptions::default());
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn test_convert_writes_resized_webp() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("wide.png");
        write_gradient(&source, 1600, 1200);

        let result = convert(item_for(source.clone()), &ConvertOptions::default());

        let dest = temp_dir.path().join("wide.webp");
        match result.outcome {
            Outcome::Success {
                original_bytes,
                compressed_bytes,
            } => {
                assert_eq!(original_bytes, fs::metadata(&source).unwrap().len());
                assert_eq!(compressed_bytes, fs::metadata(&dest).unwrap().len());
            }
            Outcome::Failure { error } => panic!("unexpected failure: {}", error),
        }
        assert_eq!(image::image_dimensions(&dest).unwrap(), (800, 600));
    }

    #[test]
    fn test_convert_does_not_upscale() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("small.jpg");
        write_gradient(&source, 400, 300);

        let result = convert(item_for(source), &ConvertOptions::default());
        assert!(result.is_success());

        let dest = temp_dir.path().join("small.webp");
        assert_eq!(image::image_dimensions(&dest).unwrap(), (400, 300));
    }

    #[test]
    fn test_convert_keeps_source_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("seed.png");
        write_gradient(&original, 64, 48);
        let source = temp_dir.path().join("photo.JPEG");
        // PNG bytes behind a JPEG name, decoded by sniffing
        fs::rename(&original, &source).unwrap();
        let before = fs::read(&source).unwrap();

        let result = convert(item_for(source.clone()), &ConvertOptions::default());
        assert!(result.is_success());

        assert!(temp_dir.path().join("photo.webp").exists());
        assert_eq!(fs::read(&source).unwrap(), before);
    }

    #[test]
    fn test_convert_handles_alpha() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("logo.png");
        RgbaImage::from_pixel(32, 32, Rgba([200, 10, 10, 128]))
            .save(&source)
            .unwrap();

        let result = convert(item_for(source), &ConvertOptions::default());
        assert!(result.is_success());
        assert_eq!(
            image::image_dimensions(temp_dir.path().join("logo.webp")).unwrap(),
            (32, 32)
        );
    }

    #[test]
    fn test_convert_overwrites_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("again.png");
        write_gradient(&source, 120, 90);
        let dest = temp_dir.path().join("again.webp");
        fs::write(&dest, b"stale bytes").unwrap();

        let first = convert(item_for(source.clone()), &ConvertOptions::default());
        let second = convert(item_for(source), &ConvertOptions::default());

        assert!(first.is_success());
        assert!(second.is_success());
        assert_eq!(image::image_dimensions(&dest).unwrap(), (120, 90));
    }

    #[test]
    fn test_convert_corrupt_file_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("broken.jpg");
        fs::write(&source, b"definitely not a jpeg").unwrap();

        let result = convert(item_for(source.clone()), &ConvertOptions::default());
        match result.outcome {
            Outcome::Failure { error } => {
                assert!(matches!(error, ConversionError::Decode { .. }));
                assert!(error.to_string().contains("broken.jpg"));
            }
            Outcome::Success { .. } => panic!("corrupt input should fail"),
        }
    }

    #[test]
    fn test_convert_missing_file_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("vanished.png");

        let result = convert(item_for(source), &ConvertOptions::default());
        match result.outcome {
            Outcome::Failure { error } => {
                assert!(matches!(error, ConversionError::Stat { .. }));
                assert!(error.to_string().contains("vanished.png"));
            }
            Outcome::Success { .. } => panic!("missing input should fail"),
        }
    }

    #[test]
    fn test_convert_unwritable_destination_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("blocked.png");
        write_gradient(&source, 16, 16);
        // A directory where the output file should go
        fs::create_dir(temp_dir.path().join("blocked.webp")).unwrap();

        let result = convert(item_for(source), &ConvertOptions::default());
        assert!(matches!(
            result.outcome,
            Outcome::Failure {
                error: ConversionError::Write { .. }
            }
        ));
    }

    #[test]
    fn test_encode_avif_produces_bytes() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([10, 120, 240])));
        let bytes = encode_image(&img, TargetFormat::Avif, 50).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_lower_quality_is_not_larger() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(256, 256, |x, y| {
            Rgb([(x * y % 256) as u8, (x ^ y) as u8, (x + 2 * y) as u8])
        }));
        let low = encode_image(&img, TargetFormat::WebP, 10).unwrap();
        let high = encode_image(&img, TargetFormat::WebP, 95).unwrap();
        assert!(low.len() <= high.len());
    }
}
