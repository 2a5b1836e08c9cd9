//! svgtex CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use env_logger::{Builder, Env};
use log::{LevelFilter, debug, error, info, warn};

use svgtex::renderer::CancelHandle;
use svgtex_cli::{Args, error_adapter::to_reportables};

/// Overrides `--log-level` with `env_logger` filter directives, e.g.
/// `SVGTEX_LOG=svgtex::renderer=trace`.
const LOG_ENV: &str = "SVGTEX_LOG";

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args);
    debug!(args:?; "Parsed arguments");

    let cancel = CancelHandle::new();
    let on_interrupt = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        warn!("Interrupted, stopping the running tool");
        on_interrupt.cancel();
    }) {
        warn!(err:%; "Could not install the Ctrl-C handler");
    }

    if let Err(err) = svgtex_cli::run(&args, &cancel) {
        let reporter = miette::GraphicalReportHandler::new();

        for reportable in to_reportables(&err) {
            let mut writer = String::new();
            if reporter.render_report(&mut writer, &reportable).is_err() {
                writer = reportable.to_string();
            }
            error!("{writer}");
        }

        process::exit(1);
    }

    info!(documents = args.inputs.len(); "Done");
}

/// Logs to stderr without timestamps, so messages read cleanly when an
/// editor extension shows them to the user.
fn init_logging(args: &Args) {
    let level = LevelFilter::from_str(args.log_level()).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level()
        );
        LevelFilter::Warn
    });

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(level >= LevelFilter::Debug)
        .parse_env(Env::new().filter(LOG_ENV));
    builder.init();

    debug!(level:%; "Logging initialised");
}
