use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::args::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    match cli::execute(&cli, &mut input, &mut output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "halo failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
