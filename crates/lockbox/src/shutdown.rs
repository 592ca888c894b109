// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stop signals for `lockbox serve`.
//!
//! The server stops accepting connections when SIGTERM or Ctrl+C arrives and
//! lets in-flight vault requests finish. Storage is checkpointed afterwards
//! by [`crate::serve::run_serve`].

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Signal that asked the server to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for the first stop signal.
///
/// If the SIGTERM handler cannot be installed, only Ctrl+C stops the server.
async fn wait_for_stop_signal() -> StopSignal {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                _ = ctrl_c => StopSignal::Interrupt,
                _ = sigterm.recv() => StopSignal::Terminate,
            },
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, stopping on Ctrl+C only");
                let _ = ctrl_c.await;
                StopSignal::Interrupt
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        StopSignal::Interrupt
    }
}

/// Token cancelled on the first stop signal; pass it to the server.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let signal = wait_for_stop_signal().await;
        info!(%signal, "stop requested, draining in-flight requests");
        trigger.cancel();
    });

    token
}
