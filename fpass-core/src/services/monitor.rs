//! Wallet monitor - periodic background refresh of the wallet
//!
//! Ticks every `period` (first tick one period after start) and refreshes in
//! a separate task so a slow backend never delays the timer. A tick that
//! lands while the previous refresh is still running is skipped. The monitor
//! stops when the session ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::result::Error;
use crate::domain::{EndReason, SessionEvent, Wallet};
use crate::ports::WalletSource;

const UPDATE_CAPACITY: usize = 16;

/// What a refresh produced
#[derive(Debug)]
pub enum MonitorUpdate {
    Refreshed(Wallet),
    Failed(Error),
    /// The session ended (logout or 401)
    SessionEnded(EndReason),
}

pub struct WalletMonitor {
    source: Arc<dyn WalletSource>,
    period: Duration,
    in_flight: Arc<AtomicBool>,
}

impl WalletMonitor {
    pub fn new(source: Arc<dyn WalletSource>, period: Duration) -> Self {
        Self {
            source,
            period,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start ticking; stops when `events` reports the session ended
    pub fn spawn(self, mut events: broadcast::Receiver<SessionEvent>) -> MonitorHandle {
        let (tx, updates) = mpsc::channel(UPDATE_CAPACITY);

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.tick(&tx),
                    event = events.recv() => match event {
                        Ok(SessionEvent::Ended(reason)) => {
                            debug!(?reason, "session ended, stopping wallet monitor");
                            let _ = tx.send(MonitorUpdate::SessionEnded(reason)).await;
                            break;
                        }
                        Ok(SessionEvent::Started { .. }) => {}
                        Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        MonitorHandle { task, updates }
    }

    fn tick(&self, tx: &mpsc::Sender<MonitorUpdate>) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("previous wallet refresh still running, skipping tick");
            return;
        }

        let source = Arc::clone(&self.source);
        let in_flight = Arc::clone(&self.in_flight);
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = source.refresh_wallet().await;
            in_flight.store(false, Ordering::Release);

            let update = match result {
                Ok(wallet) => MonitorUpdate::Refreshed(wallet),
                Err(e) => {
                    warn!(error = %e, "background wallet refresh failed");
                    MonitorUpdate::Failed(e)
                }
            };
            let _ = tx.send(update).await;
        });
    }
}

/// Running monitor; aborting or dropping it stops the timer
pub struct MonitorHandle {
    task: JoinHandle<()>,
    updates: mpsc::Receiver<MonitorUpdate>,
}

impl MonitorHandle {
    /// Next update; `None` once the monitor has stopped and drained
    pub async fn next(&mut self) -> Option<MonitorUpdate> {
        self.updates.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Result;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl CountingSource {
        fn new(delay: Option<Duration>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WalletSource for CountingSource {
        async fn refresh_wallet(&self) -> Result<Wallet> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Wallet::new("FP-1", Decimal::from(n as u64)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_period() {
        let source = CountingSource::new(None);
        let (_events_tx, events) = broadcast::channel(4);
        let _handle =
            WalletMonitor::new(source.clone(), Duration::from_secs(30)).spawn(events);

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(source.calls(), 0);

        tokio::time::sleep(Duration::from_secs(66)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_skips_overlapping_tick() {
        let source = CountingSource::new(Some(Duration::from_secs(45)));
        let (_events_tx, events) = broadcast::channel(4);
        let _handle =
            WalletMonitor::new(source.clone(), Duration::from_secs(30)).spawn(events);

        // starts at 30s (busy until 75s), skips 60s, starts again at 90s
        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_carry_refreshed_wallet() {
        let source = CountingSource::new(None);
        let (_events_tx, events) = broadcast::channel(4);
        let mut handle = WalletMonitor::new(source, Duration::from_secs(30)).spawn(events);

        match handle.next().await {
            Some(MonitorUpdate::Refreshed(wallet)) => assert_eq!(wallet.balance, Decimal::ONE),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_session_ends() {
        let source = CountingSource::new(None);
        let (events_tx, events) = broadcast::channel(4);
        let mut handle =
            WalletMonitor::new(source.clone(), Duration::from_secs(30)).spawn(events);

        events_tx.send(SessionEvent::Ended(EndReason::Expired)).unwrap();

        assert!(matches!(
            handle.next().await,
            Some(MonitorUpdate::SessionEnded(EndReason::Expired))
        ));
        assert!(handle.next().await.is_none());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(source.calls(), 0);
    }
}
