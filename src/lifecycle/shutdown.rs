//! Stop signal shared by the sidecar loop and the aggregator server.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Long-running loops take a receiver from [`Shutdown::subscribe`] and exit
/// when [`Shutdown::trigger`] fires. Subscribe before triggering: a receiver
/// created afterwards does not observe the signal.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of loops still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
