//! Backend thread entry point.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::time::Duration;
use tokio::runtime::Runtime;

use super::Backend;
use crate::protocol::{BackendAction, GuiEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the backend event loop on a tokio runtime.
///
/// Returns when the UI drops its `BackendAction` sender.
pub fn run_backend(action_rx: Receiver<BackendAction>, event_tx: Sender<GuiEvent>) {
    // Create a Tokio runtime for this thread
    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Tokio runtime");
            let _ = event_tx.send(GuiEvent::Error(format!(
                "Failed to create Tokio runtime: {}",
                e
            )));
            return;
        }
    };

    rt.block_on(async move {
        let mut backend = Backend::new(event_tx);

        loop {
            // Drain actions from the UI without blocking the runtime
            loop {
                match action_rx.try_recv() {
                    Ok(action) => backend.handle_action(action),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::info!("UI closed, backend exiting");
                        return;
                    }
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    });
}
