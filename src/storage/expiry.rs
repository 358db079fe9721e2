//! Background Expiry Sweeper
//!
//! Lazy expiry removes a stale entry only when something touches its key. A key
//! that expires and is never read again would otherwise stay in memory until
//! it is overwritten. The sweeper is an optional tokio task that periodically
//! calls [`StorageEngine::cleanup_expired`] to reclaim those entries.
//!
//! The sweep takes the engine's store lock, the same one `get` and `set` use,
//! so it is serialized with every access-time expiry check.

use crate::storage::StorageEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 1s)
    pub interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(engine: Arc<StorageEngine>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            interval_ms = config.interval.as_millis() as u64,
            "Background expiry sweeper started"
        );
        tokio::spawn(sweeper_loop(engine, config, shutdown_rx));

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        if self.shutdown_tx.send(true).is_ok() {
            info!("Background expiry sweeper stopped");
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    engine: Arc<StorageEngine>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // A zero period would panic in `interval`
    let mut ticker = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let expired = engine.cleanup_expired();
        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = engine.len(),
                "Expired keys cleaned up"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> ExpiryConfig {
        ExpiryConfig {
            interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_sweeper_cleans_expired_keys() {
        let engine = Arc::new(StorageEngine::new());

        for i in 0..10 {
            engine.set(format!("key{}", i), "value", Some(Duration::from_millis(30)));
        }
        engine.set("persistent", "value", None);
        assert_eq!(engine.len(), 11);

        let _sweeper = ExpirySweeper::start(Arc::clone(&engine), fast_config());

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Swept without any access to the expired keys
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.get("persistent"), Some("value".to_string()));
        assert_eq!(engine.stats().expired, 10);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_drop() {
        let engine = Arc::new(StorageEngine::new());

        {
            let _sweeper = ExpirySweeper::start(Arc::clone(&engine), fast_config());
            tokio::time::sleep(Duration::from_millis(30)).await;
        }

        engine.set("key", "value", Some(Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(80)).await;

        // Nothing swept it, but the entry is still stored until accessed
        assert_eq!(engine.len(), 1);
        assert!(engine.get("key").is_none());
        assert_eq!(engine.len(), 0);
    }
}
