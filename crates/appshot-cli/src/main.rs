//! appshot: capture a macOS application window from the command line

use std::{io, process::ExitCode};

use appshot_core::capture::create_default_backend;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the rendered image
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("appshot_cli=info,appshot_core=warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let backend = create_default_backend();
    let code = appshot_cli::run(std::env::args_os(), &backend, &mut io::stdout(), &mut io::stderr()).await;
    ExitCode::from(code)
}
