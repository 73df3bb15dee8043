use crate::error::Result;
use crate::logger::{is_quiet, is_verbose};
use crate::processing::{convert, ConversionResult, ConvertOptions};
use crate::report::{format_result_line, RunSummary};
use crate::utils::create_progress_bar;
use crate::walker::discover;
use crate::{error, info, verbose, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Converts every image under `options.images_root`, one at a time.
///
/// Per-file failures are logged and counted; only an unusable images root
/// returns `Err`, and it does so before anything is written. `cancel` is
/// checked between files, never during one, so a stopped run leaves no
/// half-written output from this loop.
pub fn run_batch(options: &ConvertOptions, cancel: &AtomicBool) -> Result<RunSummary> {
    info!(
        "🚀 Converting images in {} to {}",
        options.images_root.display(),
        options.target_format
    );
    verbose!(
        "Bounding box {}x{}, quality {}",
        options.max_width,
        options.max_height,
        options.quality
    );

    let start_time = Instant::now();
    let items = discover(&options.images_root, options.target_format)?;

    if items.is_empty() {
        warn!(
            "No JPEG or PNG images found in {}",
            options.images_root.display()
        );
    } else {
        info!("📊 Found {} image files to convert", items.len());
    }

    let progress = create_progress_bar(items.len() as u64, !is_quiet() && !is_verbose());
    let mut summary = RunSummary::new();

    for item in items {
        if cancel.load(Ordering::SeqCst) {
            summary.interrupted = true;
            break;
        }

        progress.set_message(item.label());
        let result = convert(item, options);
        progress.suspend(|| log_result(&result));
        summary.record(&result);
        progress.inc(1);
    }

    progress.finish_and_clear();

    println!();
    println!("{}", summary);
    verbose!("Finished in {:.2?}", start_time.elapsed());

    Ok(summary)
}

fn log_result(result: &ConversionResult) {
    let line = format_result_line(result);
    if result.is_success() {
        info!("{}", line);
    } else {
        error!("{}", line);
    }
}
