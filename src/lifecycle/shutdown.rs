//! Graceful shutdown coordination.

use std::future::Future;

use tokio::sync::broadcast;

/// Fan-out shutdown signal shared by the server and background tasks.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Fire the signal. Listeners registered later are not notified.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners = notified, "Shutdown triggered");
    }

    /// A future that resolves once [`trigger`](Self::trigger) is called.
    ///
    /// The listener is registered when this is called, not when first polled.
    pub fn notified(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
