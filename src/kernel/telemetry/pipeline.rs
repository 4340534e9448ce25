use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{debug, warn};
use uuid::Uuid;

use super::aggregate::{PipelineSummary, TelemetryAggregate};
use super::event::{EventDraft, TelemetryEvent};
use crate::kernel::config::{ConfigError, TelemetryConfig};
use crate::kernel::time::MonotonicClock;

/// Subscriber callback. An `Err` is recovered by the pipeline: logged,
/// delivery continues to the remaining subscribers.
pub type Subscriber = dyn Fn(&TelemetryEvent) -> anyhow::Result<()> + Send + Sync;

/// Unsubscribe handle returned by `on_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct BufferState {
    buffer: Vec<TelemetryEvent>,
    aggregates: HashMap<(String, String), TelemetryAggregate>,
    total_events: u64,
    last_flush: Instant,
}

/// Event bus with bounded buffering, per-(category, kind) aggregation and
/// synchronous subscriber fan-out.
///
/// All methods take `&self`; the buffer/aggregate table and the subscriber
/// list each sit behind their own mutex. Subscribers are invoked from a
/// snapshot of the list, with no lock held, so a concurrent `record` from
/// another flow is never blocked by subscriber code.
pub struct TelemetryPipeline {
    config: TelemetryConfig,
    clock: MonotonicClock,
    state: Mutex<BufferState>,
    subscribers: Mutex<Vec<(SubscriberId, Arc<Subscriber>)>>,
    next_subscriber: AtomicU64,
}

impl std::fmt::Debug for TelemetryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryPipeline")
            .field("config", &self.config)
            .field("next_subscriber", &self.next_subscriber)
            .finish_non_exhaustive()
    }
}

impl TelemetryPipeline {
    pub fn new(config: TelemetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity = config.max_buffer_size;
        Ok(Self {
            config,
            clock: MonotonicClock::new(),
            state: Mutex::new(BufferState {
                buffer: Vec::with_capacity(capacity),
                aggregates: HashMap::new(),
                total_events: 0,
                last_flush: Instant::now(),
            }),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(0),
        })
    }

    /// Record an event. Missing identifier/timestamp are auto-filled, the
    /// buffer and the (category, kind) aggregate are updated, then every
    /// subscriber is notified in registration order. After notification the
    /// flush policy is checked. Returns the fully-populated event.
    pub fn record(&self, draft: EventDraft) -> TelemetryEvent {
        let event = TelemetryEvent {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            timestamp_ms: draft.timestamp_ms.unwrap_or_else(|| self.clock.now_ms()),
            category: draft.category,
            kind: draft.kind,
            severity: draft.severity,
            message: draft.message,
            data: draft.data,
        };

        {
            let mut state = self.state.lock().unwrap();
            state.buffer.push(event.clone());
            state.total_events += 1;
            let key = (event.category.clone(), event.kind.clone());
            state
                .aggregates
                .entry(key)
                .and_modify(|agg| agg.absorb(&event))
                .or_insert_with(|| TelemetryAggregate::from_event(&event));
        }

        self.notify(&event);
        self.maybe_auto_flush();

        event
    }

    /// Register a subscriber. Delivery order is registration order.
    pub fn on_event<F>(&self, subscriber: F) -> SubscriberId
    where
        F: Fn(&TelemetryEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::SeqCst));
        self.subscribers
            .lock()
            .unwrap()
            .push((id, Arc::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns false if the id was never registered or
    /// was already removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subs = self.subscribers.lock().unwrap();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Drain and return the buffered events. Aggregates and the lifetime
    /// total survive. Resets the automatic-flush timer.
    pub fn flush(&self) -> Vec<TelemetryEvent> {
        let mut state = self.state.lock().unwrap();
        state.last_flush = Instant::now();
        std::mem::take(&mut state.buffer)
    }

    /// Point-in-time copy of the lifetime event count and the aggregate
    /// table. Does not mutate state.
    pub fn summary(&self) -> PipelineSummary {
        let state = self.state.lock().unwrap();
        PipelineSummary {
            total_events: state.total_events,
            aggregates: state.aggregates.clone(),
        }
    }

    fn notify(&self, event: &TelemetryEvent) {
        // Snapshot the list so subscriber code runs without the lock and may
        // itself subscribe or record without deadlocking.
        let snapshot: Vec<(SubscriberId, Arc<Subscriber>)> =
            self.subscribers.lock().unwrap().clone();

        for (id, subscriber) in snapshot {
            if let Err(err) = (subscriber.as_ref())(event) {
                warn!(subscriber = id.0, error = %err, "telemetry subscriber failed");
            }
        }
    }

    fn maybe_auto_flush(&self) {
        let mut state = self.state.lock().unwrap();
        let full = state.buffer.len() >= self.config.max_buffer_size;
        let stale = state.last_flush.elapsed() >= self.config.flush_interval;
        if full || stale {
            let drained = state.buffer.len();
            state.buffer.clear();
            state.last_flush = Instant::now();
            debug!(drained, full, stale, "telemetry auto-flush");
        }
    }
}
