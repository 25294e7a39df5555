//! Twitch chat message parsing and dispatch
//!
//! * [`irc`](./irc) - parsing raw IRC lines, with Twitch-specific extensions
//!   (not RFC2812 compliant)
//! * [`tmi`](./tmi) - decoding Twitch-specific commands (PRIVMSG, ROOMSTATE,
//!   JOIN/PART, NOTICE) into owned events
//! * [`sink`](./sink) - per-event-type fan-out to subscribers
//! * [`handler`](./handler) - one call per received line: parse, decode,
//!   dispatch
//! * [`reader`](./reader) - drives a handler from an async line source

pub mod handler;
pub mod irc;
pub mod reader;
pub mod sink;
pub mod tmi;

pub use handler::{Config, IrcHandler, Stats};
pub use irc::{Error, Result};
pub use sink::{Capacity, Sink, Sinks};
pub use tmi::{Badge, Changed, ChatMessage, Color, Join, Membership, Message, Notice, NoticeType, Part, RoomSettings, Roomstate};
