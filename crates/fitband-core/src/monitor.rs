//! Connection status monitoring.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

use fitband_types::ConnectionState;

/// Collapses the raw four-state connection stream into the published
/// connection boolean.
///
/// Every observed transition is forwarded, including repeats of the
/// same boolean; the `watch` slot notifies observers on each send.
/// The monitor runs until the stream closes or the owning session is
/// cancelled.
pub struct ConnectionStatusMonitor;

impl ConnectionStatusMonitor {
    /// Consume `events` and publish the collapsed boolean to `connected`.
    pub async fn run(
        mut events: broadcast::Receiver<ConnectionState>,
        connected: watch::Sender<bool>,
    ) {
        loop {
            match events.recv().await {
                Ok(state) => {
                    let is_connected = state.is_connected();
                    trace!(?state, is_connected, "connection state transition");
                    let _ = connected.send(is_connected);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "connection event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
