//! Turns raw lines into events and hands them to the matching [`Sink`](crate::sink::Sink).
//!
//! ```
//! use twitch_irc::{Capacity, Config, IrcHandler, Sinks};
//!
//! let mut sinks = Sinks::default();
//! let joins = sinks.joins.subscribe(Capacity::Unbounded);
//! let handler = IrcHandler::new(Config::default(), sinks);
//!
//! assert_eq!(Ok(true), handler.handle(b":a!a@a.tmi.twitch.tv JOIN #forsen"));
//! assert_eq!(Ok(false), handler.handle(b"PING :tmi.twitch.tv"));
//! assert_eq!("forsen", joins.try_recv().unwrap().channel);
//! ```
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

use crate::irc::{self, Result};
use crate::sink::Sinks;
use crate::tmi::{self, Message};

#[derive(Clone, Default, Debug, PartialEq)]
pub struct Config {
    /// Keep the raw line on every [`ChatMessage`](crate::tmi::ChatMessage).
    pub keep_source: bool,
}

/// Counters since the handler was created.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Stats {
    /// Lines decoded and dispatched
    pub handled: u64,
    /// Lines with a command nothing decodes
    pub ignored: u64,
    /// Lines with a decoded command that failed to decode
    pub malformed: u64,
    /// Events dropped by full or cancelled sinks
    pub dropped: u64,
}

#[derive(Debug)]
pub struct IrcHandler {
    config: Config,
    sinks: Sinks,
    handled: AtomicU64,
    ignored: AtomicU64,
    malformed: AtomicU64,
}

impl IrcHandler {
    pub fn new(config: Config, sinks: Sinks) -> IrcHandler {
        IrcHandler {
            config,
            sinks,
            handled: AtomicU64::new(0),
            ignored: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
        }
    }

    /// Decodes one line and dispatches the event without waiting on
    /// subscribers.
    ///
    /// Returns `Ok(false)` for commands that aren't decoded (`PING`, `CAP`,
    /// numerics, ...), and an error if a decoded command is malformed.
    pub fn handle(&self, line: &[u8]) -> Result<bool> {
        match self.decode(line)? {
            Some(message) => {
                self.dispatch(message);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Like [`IrcHandler::handle`], but waits for room in full bounded
    /// queues until `cancel` fires.
    ///
    /// Only subscribers of the decoded event's own sink are waited on, but
    /// the caller is held up until they have room.
    pub async fn handle_async(&self, line: &[u8], cancel: &CancellationToken) -> Result<bool> {
        match self.decode(line)? {
            Some(message) => {
                self.dispatch_async(message, cancel).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn sinks(&self) -> &Sinks { &self.sinks }

    pub fn stats(&self) -> Stats {
        Stats {
            handled: self.handled.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            dropped: self.sinks.dropped(),
        }
    }

    fn decode(&self, line: &[u8]) -> Result<Option<Message>> {
        let decoded = tmi::as_line(line).and_then(|line| {
            let msg = irc::Message::parse(line);
            let decoded = Message::decode(&msg, self.config.keep_source)?;
            if decoded.is_none() {
                log::debug!("Ignoring {} ({:?})", msg.cmd.as_str(), msg.channel());
            }
            Ok(decoded)
        });
        let counter = match &decoded {
            Ok(Some(_)) => &self.handled,
            Ok(None) => &self.ignored,
            Err(_) => &self.malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        decoded
    }

    fn dispatch(&self, message: Message) {
        match message {
            Message::Privmsg(m) => self.sinks.chat_messages.try_deliver(m),
            Message::RoomState(m) => self.sinks.roomstates.try_deliver(m),
            Message::Join(m) => self.sinks.joins.try_deliver(m),
            Message::Part(m) => self.sinks.parts.try_deliver(m),
            Message::Notice(m) => self.sinks.notices.try_deliver(m),
        }
    }

    async fn dispatch_async(&self, message: Message, cancel: &CancellationToken) {
        match message {
            Message::Privmsg(m) => self.sinks.chat_messages.deliver(m, cancel).await,
            Message::RoomState(m) => self.sinks.roomstates.deliver(m, cancel).await,
            Message::Join(m) => self.sinks.joins.deliver(m, cancel).await,
            Message::Part(m) => self.sinks.parts.deliver(m, cancel).await,
            Message::Notice(m) => self.sinks.notices.deliver(m, cancel).await,
        }
    }
}
