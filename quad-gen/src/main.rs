//! Command-line entry point for the quadtree generator.
//!
//! Argument handling lives in [`cli`]; the two commands are in
//! [`generate`] and [`inspect`].

mod cli;
mod generate;
mod inspect;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Installs the stderr log subscriber.
///
/// Filtering follows `RUST_LOG`; without it only warnings and errors are
/// shown, so stdout carries nothing but the prompt and confirmation.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = cli::Cli::parse();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match cli::run(cli, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
