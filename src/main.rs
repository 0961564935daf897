use clap::Parser;
use comictidy::cli::{Args, exit_codes, run_cli};
use comictidy::output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run_cli(&args) {
        Ok(report) if report.has_failures() => ExitCode::from(exit_codes::INCOMPLETE),
        Ok(_) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::from(exit_codes::FATAL)
        }
    }
}

/// Filter used when `RUST_LOG` is not set.
fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
