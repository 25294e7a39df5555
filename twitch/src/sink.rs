//! Per-event-type delivery.
//!
//! Each [`Sink`] fans an event out to every subscriber registered on it.
//! Subscribers own separate queues, so one that stops reading only fills
//! its own queue.
use std::sync::atomic::{AtomicU64, Ordering};

use async_channel as mpmc;
use futures::future;
use tokio_util::sync::CancellationToken;

use crate::tmi::{ChatMessage, Join, Notice, Part, Roomstate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capacity {
    /// At most this many undelivered events; further events are dropped.
    Bounded(usize),
    Unbounded,
}

#[derive(Debug)]
pub struct Sink<T> {
    name: &'static str,
    subscribers: Vec<mpmc::Sender<T>>,
    dropped: AtomicU64,
}

impl<T: Clone> Sink<T> {
    pub fn new(name: &'static str) -> Sink<T> {
        Sink {
            name,
            subscribers: Vec::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Registers a consumer. Every consumer gets its own copy of each event.
    pub fn subscribe(&mut self, capacity: Capacity) -> mpmc::Receiver<T> {
        let (tx, rx) = match capacity {
            Capacity::Bounded(n) => mpmc::bounded(n.max(1)),
            Capacity::Unbounded => mpmc::unbounded(),
        };
        self.subscribers.push(tx);
        rx
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn has_subscribers(&self) -> bool { !self.subscribers.is_empty() }

    /// Events dropped because a subscriber's queue was full.
    pub fn dropped(&self) -> u64 { self.dropped.load(Ordering::Relaxed) }

    fn record_drop(&self, reason: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        log::warn!("[{}] Dropped event: {}", self.name, reason);
    }

    /// Enqueues without waiting. Full queues drop the event for that
    /// subscriber, closed ones are skipped.
    pub fn try_deliver(&self, event: T) {
        for tx in &self.subscribers {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpmc::TrySendError::Full(_)) => self.record_drop("subscriber queue is full"),
                Err(mpmc::TrySendError::Closed(_)) => {
                    log::debug!("[{}] Subscriber went away, discarding event", self.name)
                }
            }
        }
    }

    /// Like [`Sink::try_deliver`], but waits for room in full queues until
    /// `cancel` fires. Events abandoned that way are counted as dropped.
    ///
    /// Full subscribers are waited on concurrently, and the others have
    /// already received the event by the time this first suspends.
    pub async fn deliver(&self, event: T, cancel: &CancellationToken) {
        let pending = self
            .subscribers
            .iter()
            .filter_map(|tx| match tx.try_send(event.clone()) {
                Ok(()) => None,
                Err(mpmc::TrySendError::Closed(_)) => {
                    log::debug!("[{}] Subscriber went away, discarding event", self.name);
                    None
                }
                Err(mpmc::TrySendError::Full(event)) => Some(self.wait_for_room(tx, event, cancel)),
            })
            .collect::<Vec<_>>();
        future::join_all(pending).await;
    }

    async fn wait_for_room(&self, tx: &mpmc::Sender<T>, event: T, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => self.record_drop("cancelled while waiting for a full queue"),
            result = tx.send(event) => {
                if result.is_err() {
                    log::debug!("[{}] Subscriber went away, discarding event", self.name);
                }
            }
        }
    }
}

/// One sink per decoded event type.
///
/// Subscribe before handing the sinks to an
/// [`IrcHandler`](crate::handler::IrcHandler); a sink nobody subscribed to
/// discards its events.
#[derive(Debug)]
pub struct Sinks {
    pub chat_messages: Sink<ChatMessage>,
    pub roomstates: Sink<Roomstate>,
    pub joins: Sink<Join>,
    pub parts: Sink<Part>,
    pub notices: Sink<Notice>,
}

impl Default for Sinks {
    fn default() -> Self {
        Sinks {
            chat_messages: Sink::new("PRIVMSG"),
            roomstates: Sink::new("ROOMSTATE"),
            joins: Sink::new("JOIN"),
            parts: Sink::new("PART"),
            notices: Sink::new("NOTICE"),
        }
    }
}

impl Sinks {
    /// Total events dropped across all sinks.
    pub fn dropped(&self) -> u64 {
        self.chat_messages.dropped()
            + self.roomstates.dropped()
            + self.joins.dropped()
            + self.parts.dropped()
            + self.notices.dropped()
    }
}
