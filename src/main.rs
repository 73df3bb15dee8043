use anyhow::Context;
use clap::Parser;
use img_webpify::cli::Args;
use img_webpify::constants::INTERRUPTED_EXIT_CODE;
use img_webpify::logger::{set_quiet_mode, set_verbose_mode};
use img_webpify::{error, run_batch, warn};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    let args = Args::parse();
    set_quiet_mode(args.quiet);
    set_verbose_mode(args.verbose);

    match run(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(INTERRUPTED_EXIT_CODE),
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run was interrupted.
fn run(args: &Args) -> anyhow::Result<bool> {
    let options = args.to_options().context("Invalid options")?;
    let cancel = setup_interrupt_handler()?;
    let summary = run_batch(&options, &cancel).context("Conversion aborted")?;
    Ok(summary.interrupted)
}

/// First Ctrl+C stops after the current file; a second one exits at once.
fn setup_interrupt_handler() -> anyhow::Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
        }
        warn!("Stopping after the current file (Ctrl+C again to quit now)");
    })
    .context("failed to set Ctrl+C handler")?;

    Ok(cancel)
}
