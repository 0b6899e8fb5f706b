//! Stop signal and in-flight work tracking for the backend.
//!
//! Requests and the background work they start each hold an [`InFlight`]
//! guard. After the listener stops accepting, [`ShutdownManager::drain`]
//! waits for the count to reach zero so a favorite being written is not cut
//! off mid-way.

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub struct ShutdownManager {
    stop: CancellationToken,
    in_flight: Arc<watch::Sender<usize>>,
}

/// Keeps shutdown waiting while alive.
#[must_use]
pub struct InFlight {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.count.send_modify(|n| *n -= 1);
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            stop: CancellationToken::new(),
            in_flight: Arc::new(in_flight),
        }
    }

    /// Resolves on Ctrl-C, SIGTERM or [`signal_shutdown`](Self::signal_shutdown).
    pub async fn wait_for_shutdown(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => return Ok(()),
                _ = signal::ctrl_c() => {},
                _ = sigterm.recv() => {},
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                biased;
                _ = self.stop.cancelled() => return Ok(()),
                _ = signal::ctrl_c() => {},
            }
        }

        tracing::info!("Shutdown signal received");
        self.stop.cancel();
        Ok(())
    }

    pub fn signal_shutdown(&self) {
        self.stop.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Register one unit of work that [`drain`](Self::drain) waits for.
    pub fn track(&self) -> InFlight {
        self.in_flight.send_modify(|n| *n += 1);
        InFlight {
            count: self.in_flight.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until no tracked work remains or `timeout` elapses.
    pub async fn drain(&self, timeout: Duration) {
        let mut count = self.in_flight.subscribe();
        let drained = tokio::time::timeout(timeout, count.wait_for(|n| *n == 0))
            .await
            .is_ok();

        if drained {
            tracing::info!("In-flight work finished");
        } else {
            tracing::warn!(
                remaining = self.in_flight(),
                "Forced shutdown after drain timeout"
            );
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_wakes_waiter() {
        let manager = Arc::new(ShutdownManager::new());
        let waiter = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.wait_for_shutdown().await })
        };
        tokio::task::yield_now().await;

        manager.signal_shutdown();
        let result = tokio::time::timeout(Duration::from_secs(2), waiter).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
        assert!(manager.is_shutting_down());
    }

    #[test]
    fn test_guards_count_in_flight_work() {
        let manager = ShutdownManager::new();
        let first = manager.track();
        let second = manager.track();
        assert_eq!(manager.in_flight(), 2);

        drop(first);
        assert_eq!(manager.in_flight(), 1);
        drop(second);
        assert_eq!(manager.in_flight(), 0);
    }
}
