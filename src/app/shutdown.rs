//! Graceful shutdown handling.

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` on the first Ctrl-C.
///
/// The scrape loop checks the token between zip codes, so the zip code in
/// flight finishes (or is abandoned unmarked) before the run stops.
pub fn spawn_ctrl_c_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current zip code");
                    cancel.cancel();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
            },
        }
    })
}

/// Stops the listener task.
pub async fn shutdown_gracefully(cancel: CancellationToken, listener: JoinHandle<()>) {
    cancel.cancel();
    let _ = listener.await;
}
