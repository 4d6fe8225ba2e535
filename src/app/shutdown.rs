//! Ctrl+C handling for the real-time driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag flipped by the signal listener.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        tracing::info!("Shutdown requested");
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Spawns a task that sets the flag on Ctrl+C. Needs a tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            flag.on_signal(tokio::signal::ctrl_c().await);
        });
    }

    /// A listener that failed to install leaves the flag untouched.
    fn on_signal(&self, outcome: std::io::Result<()>) {
        match outcome {
            Ok(()) => self.request(),
            Err(e) => tracing::error!(error = %e, "Unable to listen for Ctrl+C"),
        }
    }
}
