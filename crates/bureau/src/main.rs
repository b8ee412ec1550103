//! Bureau CLI - inspect syscall ABIs and dry-run dispatch decisions

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let metrics_handle = if cli.metrics {
        bureau::metrics::CliRecorder::new().install()
    } else {
        None
    };

    bureau::metrics::init();

    let default_level = if cli.verbose {
        "bureau=debug"
    } else if cli.silent {
        "bureau=error"
    } else {
        "bureau=info"
    };
    let directive = default_level
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = commands::run_command(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}
