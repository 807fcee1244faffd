//! Signal-driven shutdown for the stdio server

use std::process::ExitCode;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::warn;

/// Signal that ended the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    /// Conventional exit status: 130 after an interrupt, 0 after terminate
    pub fn exit_status(self) -> u8 {
        match self {
            ShutdownSignal::Interrupt => 130,
            ShutdownSignal::Terminate => 0,
        }
    }

    /// [`Self::exit_status`] as an [`ExitCode`]
    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// SIGINT / SIGTERM handlers, registered as soon as the listener exists
///
/// Must be created inside a Tokio runtime. Once installed, neither signal
/// takes its default action, so the listener should be created before the
/// server does anything that can block.
pub struct ShutdownListener {
    #[cfg(unix)]
    interrupt: Option<Signal>,
    #[cfg(unix)]
    terminate: Option<Signal>,
}

impl ShutdownListener {
    /// Registers the handlers; a handler that cannot be registered never fires
    #[cfg(unix)]
    pub fn install() -> Self {
        Self {
            interrupt: register(SignalKind::interrupt(), "SIGINT"),
            terminate: register(SignalKind::terminate(), "SIGTERM"),
        }
    }

    /// Registers the handlers; a handler that cannot be registered never fires
    #[cfg(not(unix))]
    pub fn install() -> Self {
        Self {}
    }

    /// Resolves with the next SIGINT or SIGTERM
    #[cfg(unix)]
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = next(&mut self.interrupt) => ShutdownSignal::Interrupt,
            _ = next(&mut self.terminate) => ShutdownSignal::Terminate,
        }
    }

    /// Resolves with the next Ctrl-C
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> ShutdownSignal {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    }
}

#[cfg(unix)]
fn register(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(stream) => Some(stream),
        Err(error) => {
            warn!(%error, "cannot listen for {name}");
            None
        }
    }
}

#[cfg(unix)]
async fn next(stream: &mut Option<Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending().await,
    }
}
