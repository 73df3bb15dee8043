use crate::error::Result;
use crate::formats::TargetFormat;
use crate::processing::ConvertOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-webpify",
    about = "Convert a folder of JPEG/PNG images to resized WebP files",
    long_about = "img-webpify walks an images folder one level deep (each subfolder is a group, \
                  loose files in the folder itself are converted too), shrinks every JPEG or PNG \
                  to fit a bounding box without ever enlarging it, and writes a lossy WebP (or AVIF) \
                  next to the original. Originals are never modified.",
    version,
    after_help = "EXAMPLES:\n  \
    img-webpify\n  \
    img-webpify ./site/images -q 80\n  \
    img-webpify ./images -w 1024 -H 1024 -f avif"
)]
pub struct Args {
    #[arg(
        help = "Images root directory (default: images)",
        long_help = "Directory whose immediate subfolders and loose files are converted. \
                     Deeper subfolders are ignored."
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'w',
        long,
        help = "Maximum output width in pixels (default: 800)",
        long_help = "Images wider than this are scaled down, keeping their aspect ratio. \
                     Smaller images are never enlarged."
    )]
    pub max_width: Option<u32>,

    #[arg(
        short = 'H',
        long,
        help = "Maximum output height in pixels (default: 1200)",
        long_help = "Images taller than this are scaled down, keeping their aspect ratio. \
                     Smaller images are never enlarged."
    )]
    pub max_height: Option<u32>,

    #[arg(
        short = 'q',
        long,
        help = "Encoding quality (0-100, default: 75)",
        long_help = "Lossy quality from 0 (smallest) to 100 (best). 75 is a good balance for photos."
    )]
    pub quality: Option<u8>,

    #[arg(
        short = 'f',
        long,
        help = "Output format (webp, avif; default: webp)",
        long_help = "Target format. The converted file keeps the source name with this extension."
    )]
    pub format: Option<TargetFormat>,

    #[arg(long, help = "Only print failures and the final summary")]
    pub quiet: bool,

    #[arg(short = 'v', long, conflicts_with = "quiet", help = "Print per-image details")]
    pub verbose: bool,
}

impl Args {
    pub fn to_options(&self) -> Result<ConvertOptions> {
        let options = ConvertOptions::new(
            self.root.clone(),
            self.max_width,
            self.max_height,
            self.quality,
            self.format,
        )?;
        Ok(options)
    }
}
