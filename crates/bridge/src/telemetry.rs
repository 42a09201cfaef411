//! Historical reads and live polling subscriptions.
//!
//! A subscription is two tasks sharing one [`CancellationToken`]: a poller
//! that fires on a fixed schedule and spawns one fetch per tick, and a
//! dispatcher that drains fetched samples from a channel into the caller's
//! callback. Slow fetches never delay the next tick, and cancelling the token
//! stops both tasks and any fetch still in flight. The dispatcher cancels the
//! token when it exits for any reason, including a panicking callback.

use std::sync::Arc;
use std::time::Duration;

use tb_backend::TelemetryBackend;
use tb_domain::identifier::is_mock_id;
use tb_domain::trace::TraceEvent;
use tb_domain::{HistoryRange, TelemetrySample};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::mock;

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(1);

pub struct TelemetryAccess {
    backend: Arc<dyn TelemetryBackend>,
    period: Duration,
}

impl TelemetryAccess {
    /// A zero `period` is replaced by [`DEFAULT_POLL_PERIOD`].
    pub fn new(backend: Arc<dyn TelemetryBackend>, period: Duration) -> Self {
        let period = if period.is_zero() {
            tracing::warn!("zero poll period, using {DEFAULT_POLL_PERIOD:?}");
            DEFAULT_POLL_PERIOD
        } else {
            period
        };
        Self { backend, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Samples for `entity_id` within `range`, in backend order.
    ///
    /// Mock entities answer with one fresh sample. A backend failure is
    /// logged and yields an empty history.
    pub async fn fetch_history(&self, entity_id: &str, range: HistoryRange) -> Vec<TelemetrySample> {
        if is_mock_id(entity_id) {
            return vec![mock::sample_mock_telemetry(entity_id)];
        }
        match self.backend.history(entity_id, range).await {
            Ok(samples) => samples.into_iter().map(TelemetrySample::normalize).collect(),
            Err(e) => {
                tracing::error!(entity_id, error = %e, "history fetch failed");
                Vec::new()
            }
        }
    }

    /// Start polling `entity_id`, invoking `callback` for every sample that
    /// carries a timestamp.
    pub fn subscribe<F>(&self, entity_id: &str, callback: F) -> Subscription
    where
        F: Fn(TelemetrySample) + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(poll(
            self.backend.clone(),
            entity_id.to_owned(),
            self.period,
            tx,
            cancel.clone(),
        ));
        tokio::spawn(dispatch(entity_id.to_owned(), rx, callback, cancel.clone()));

        TraceEvent::SubscriptionStarted {
            entity_id: entity_id.to_owned(),
            period_ms: self.period.as_millis() as u64,
        }
        .emit();

        Subscription {
            entity_id: entity_id.to_owned(),
            cancel,
        }
    }
}

/// Handle to a live subscription. Dropping it does not stop polling; call
/// [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    entity_id: String,
    cancel: CancellationToken,
}

impl Subscription {
    /// Stop polling. Idempotent; once this returns no new callback starts.
    pub fn unsubscribe(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(entity_id = %self.entity_id, "unsubscribing");
            self.cancel.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

async fn poll(
    backend: Arc<dyn TelemetryBackend>,
    entity_id: String,
    period: Duration,
    tx: mpsc::UnboundedSender<TelemetrySample>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if tx.is_closed() {
            break;
        }

        if is_mock_id(&entity_id) {
            if tx.send(mock::sample_mock_telemetry(&entity_id)).is_err() {
                break;
            }
            continue;
        }

        let backend = backend.clone();
        let entity_id = entity_id.clone();
        let tx = tx.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                r = backend.latest(&entity_id) => r,
            };
            match result {
                Ok(sample) if sample.has_time() => {
                    if tx.send(sample.normalize()).is_err() {
                        cancel.cancel();
                    }
                }
                Ok(_) => tracing::warn!(entity_id = %entity_id, "sample without timestamp dropped"),
                Err(e) => tracing::warn!(entity_id = %entity_id, error = %e, "telemetry poll failed"),
            }
        });
    }
}

async fn dispatch<F>(
    entity_id: String,
    mut rx: mpsc::UnboundedReceiver<TelemetrySample>,
    callback: F,
    cancel: CancellationToken,
) where
    F: Fn(TelemetrySample) + Send + Sync + 'static,
{
    let _stop_poller = cancel.clone().drop_guard();
    loop {
        let sample = tokio::select! {
            _ = cancel.cancelled() => break,
            s = rx.recv() => match s {
                Some(s) => s,
                None => break,
            },
        };
        if cancel.is_cancelled() {
            break;
        }
        callback(sample);
    }
    TraceEvent::SubscriptionStopped { entity_id }.emit();
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use tb_backend::{CommandRequest, CommandResponse, Dictionary};
    use tb_domain::command::CommandSchema;
    use tb_domain::error::{Error, Result};
    use tb_domain::{Entity, ImageEntry};

    /// Backend whose history is either a fixed list or an error.
    struct HistoryOnly {
        history: Option<Vec<TelemetrySample>>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl TelemetryBackend for HistoryOnly {
        async fn entities(&self) -> Result<Vec<Entity>> {
            Ok(Vec::new())
        }
        async fn dictionary(&self) -> Result<Dictionary> {
            Ok(Dictionary::default())
        }
        async fn history(&self, _: &str, _: HistoryRange) -> Result<Vec<TelemetrySample>> {
            *self.calls.lock() += 1;
            self.history
                .clone()
                .ok_or_else(|| Error::Http("connection refused".into()))
        }
        async fn latest(&self, _: &str) -> Result<TelemetrySample> {
            Err(Error::Http("unused".into()))
        }
        async fn command_targets(&self) -> Result<CommandSchema> {
            Ok(CommandSchema::new())
        }
        async fn execute_command(&self, _: CommandRequest) -> Result<CommandResponse> {
            Err(Error::Http("unused".into()))
        }
        async fn images(&self) -> Result<Vec<ImageEntry>> {
            Ok(Vec::new())
        }
    }

    fn access(history: Option<Vec<TelemetrySample>>) -> (TelemetryAccess, Arc<HistoryOnly>) {
        let backend = Arc::new(HistoryOnly {
            history,
            calls: Mutex::new(0),
        });
        (
            TelemetryAccess::new(backend.clone(), Duration::from_secs(1)),
            backend,
        )
    }

    #[tokio::test]
    async fn history_keeps_backend_order_and_normalizes() {
        let (access, _) = access(Some(vec![
            TelemetrySample::new().with("timestamp", 2000),
            TelemetrySample::new().with("timestamp", 1000),
        ]));
        let samples = access.fetch_history("rover-7", HistoryRange::default()).await;
        let times: Vec<_> = samples.iter().map(|s| s.get("utc").cloned()).collect();
        assert_eq!(times, vec![Some(json!(2000)), Some(json!(1000))]);
    }

    #[tokio::test]
    async fn history_failure_is_empty() {
        let (access, _) = access(None);
        let samples = access.fetch_history("rover-7", HistoryRange::default()).await;
        assert!(samples.is_empty());
    }

    #[test]
    fn zero_period_falls_back_to_default() {
        let backend = Arc::new(HistoryOnly {
            history: None,
            calls: Mutex::new(0),
        });
        let access = TelemetryAccess::new(backend, Duration::ZERO);
        assert_eq!(access.period(), DEFAULT_POLL_PERIOD);
    }

    #[tokio::test]
    async fn mock_history_skips_backend() {
        let (access, backend) = access(None);
        let samples = access
            .fetch_history("mock-rover-1", HistoryRange::default())
            .await;
        assert_eq!(samples.len(), 1);
        assert!(samples[0].domain_value().is_some());
        assert_eq!(*backend.calls.lock(), 0);
    }
}
