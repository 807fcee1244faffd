//! appshot-mcp: MCP server for macOS application window capture
//!
//! Serves `screenshot_app` over stdio until the client closes the transport
//! or the process receives SIGINT (exit 130) or SIGTERM (exit 0).

use std::{io, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use appshot_core::capture::create_default_backend;
use appshot_mcp_server::{mcp::AppshotMcpServer, shutdown::ShutdownListener};
use rmcp::{ServiceExt, transport::stdio};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// How long runtime shutdown waits for in-flight work. The stdio reader sits
/// in a blocking read that only ends when the client closes stdin.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> ExitCode {
    // stdout is the protocol stream, so logs go to stderr
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("appshot_mcp=info,appshot_mcp_server=info,appshot_core=info")
        }))
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();

    let runtime = match Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to start Tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(serve()) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    };
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    code
}

async fn serve() -> Result<ExitCode> {
    let mut shutdown = ShutdownListener::install();
    info!("appshot-mcp server starting (transport: stdio)");

    let backend = create_default_backend();
    if backend.is_supported() {
        info!(backend = backend.name, "backend initialized");
    } else {
        warn!(os = %backend.platform.os, "captures will fail: macOS is required");
    }

    // The handshake blocks until the client sends `initialize`
    let service = tokio::select! {
        started = AppshotMcpServer::new(backend).serve(stdio()) => {
            started.context("failed to start MCP stdio transport")?
        }
        signal = shutdown.recv() => {
            info!(?signal, "shutdown requested before initialization");
            return Ok(signal.exit_code());
        }
    };
    info!("Waiting for MCP requests...");

    let cancel = service.cancellation_token();
    let waiting = service.waiting();
    tokio::pin!(waiting);

    let (reason, signal) = tokio::select! {
        reason = &mut waiting => (reason, None),
        signal = shutdown.recv() => {
            info!(?signal, "shutdown requested");
            cancel.cancel();
            ((&mut waiting).await, Some(signal))
        }
    };
    let reason = reason.context("MCP service task failed")?;
    info!(?reason, "appshot-mcp server shutting down");

    Ok(signal.map_or(ExitCode::SUCCESS, |signal| signal.exit_code()))
}
