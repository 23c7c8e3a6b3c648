//! `EventBus` -- the per-thread append-only event log with replay and
//! fan-out to concurrent subscribers.

use crate::envelope::{AgentEvent, EventPayload, PROTOCOL_VERSION};
use crate::error::EventBusError;
use async_stream::stream;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError, Sender};
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

pub type EventResult = std::result::Result<AgentEvent, EventBusError>;
pub type EventStream = Pin<Box<dyn Stream<Item = EventResult> + Send>>;

/// A lagged subscriber's channel is already full, so the terminal
/// `SubscriberLagged` can never be queued on it. This flag is delivered
/// out-of-band instead: `publish` sets it and drops the sender, and the
/// stream returned by `subscribe` checks it once the channel closes.
struct SubscriberHandle {
    tx: Sender<AgentEvent>,
    lag_seq_id: Arc<AtomicU64>,
}

struct ThreadLog {
    history: VecDeque<AgentEvent>,
    next_seq: u64,
    subscribers: Vec<SubscriberHandle>,
}

impl ThreadLog {
    fn new() -> Self {
        Self { history: VecDeque::new(), next_seq: 1, subscribers: Vec::new() }
    }
}

pub struct EventBus {
    threads: Mutex<HashMap<String, ThreadLog>>,
    buffer_high_water: usize,
}

impl EventBus {
    pub fn new(buffer_high_water: usize) -> Self {
        Self { threads: Mutex::new(HashMap::new()), buffer_high_water: buffer_high_water.max(1) }
    }

    /// Assign the next `seq_id`, append to the log, and fan out to every
    /// live subscriber. A subscriber whose channel is full is flagged
    /// with `SubscriberLagged` and dropped -- it must re-subscribe. The
    /// flag surfaces once its stream drains the backlog and closes.
    pub fn publish(&self, thread_id: &str, source: &str, payload: EventPayload) -> AgentEvent {
        let mut threads = self.threads.lock();
        let log = threads.entry(thread_id.to_string()).or_insert_with(ThreadLog::new);

        let event = AgentEvent {
            protocol_version: PROTOCOL_VERSION.to_string(),
            seq_id: log.next_seq,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now(),
            source: source.to_string(),
            payload,
        };
        log.next_seq += 1;
        log.history.push_back(event.clone());

        log.subscribers.retain(|sub| match sub.tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(thread_id, seq_id = event.seq_id, "subscriber lagged, disconnecting");
                sub.lag_seq_id.store(event.seq_id + 1, Ordering::SeqCst);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });

        event
    }

    /// Replay events with `seq_id > after_seq_id`, then stream new
    /// events as they are published. If the backlog alone exceeds the
    /// buffer high-water mark, the subscriber is lagged immediately.
    pub fn subscribe(&self, thread_id: &str, after_seq_id: Option<u64>) -> EventStream {
        let after = after_seq_id.unwrap_or(0);
        let (tx, mut rx) = mpsc::channel(self.buffer_high_water);

        let mut threads = self.threads.lock();
        let log = threads.entry(thread_id.to_string()).or_insert_with(ThreadLog::new);

        let backlog: Vec<AgentEvent> = log.history.iter().filter(|e| e.seq_id > after).cloned().collect();
        if backlog.len() > self.buffer_high_water {
            let last_seq_id = backlog.last().map(|e| e.seq_id).unwrap_or(after);
            return Box::pin(tokio_stream::once(Err(EventBusError::SubscriberLagged { last_seq_id })));
        }

        for event in backlog {
            // Capacity was sized for the backlog above, so this cannot fail.
            let _ = tx.try_send(event);
        }
        let lag_seq_id = Arc::new(AtomicU64::new(0));
        log.subscribers.push(SubscriberHandle { tx, lag_seq_id: Arc::clone(&lag_seq_id) });
        drop(threads);

        Box::pin(stream! {
            while let Some(event) = rx.recv().await {
                yield Ok(event);
            }
            let flagged = lag_seq_id.load(Ordering::SeqCst);
            if flagged != 0 {
                yield Err(EventBusError::SubscriberLagged { last_seq_id: flagged - 1 });
            }
        })
    }

    pub fn latest_seq(&self, thread_id: &str) -> u64 {
        self.threads.lock().get(thread_id).map(|l| l.next_seq.saturating_sub(1)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{AgentStatus, LifecycleStatus};

    #[tokio::test]
    async fn seq_ids_are_monotonic_and_gap_free() {
        let bus = EventBus::new(16);
        for i in 0..3 {
            let event = bus.publish("t1", "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Running });
            assert_eq!(event.seq_id, i + 1);
        }
        assert_eq!(bus.latest_seq("t1"), 3);
    }

    #[tokio::test]
    async fn subscriber_replays_backlog_then_sees_live_events() {
        let bus = EventBus::new(16);
        bus.publish("t1", "scheduler", EventPayload::AgentStatus { status: AgentStatus::Running, node: "news".into() });
        bus.publish("t1", "scheduler", EventPayload::AgentStatus { status: AgentStatus::Done, node: "news".into() });

        let mut stream = bus.subscribe("t1", Some(1));
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.seq_id, 2);

        bus.publish("t1", "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Done });
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.seq_id, 3);
    }

    #[tokio::test]
    async fn slow_subscriber_is_disconnected_with_subscriber_lagged() {
        let bus = EventBus::new(1);
        let mut stream = bus.subscribe("t1", None);

        for _ in 0..5 {
            bus.publish("t1", "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Running });
        }

        // The channel has capacity 1 and nothing has drained it yet, so
        // the second publish already finds it full.
        let mut saw_lag = false;
        while let Some(item) = stream.next().await {
            if let Err(EventBusError::SubscriberLagged { .. }) = item {
                saw_lag = true;
                break;
            }
        }
        assert!(saw_lag);
    }

    #[tokio::test]
    async fn oversized_backlog_lags_immediately_on_subscribe() {
        let bus = EventBus::new(1);
        for _ in 0..3 {
            bus.publish("t1", "scheduler", EventPayload::LifecycleStatus { status: LifecycleStatus::Running });
        }
        let mut stream = bus.subscribe("t1", None);
        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(EventBusError::SubscriberLagged { .. })));
    }
}
