//! Twitch-specific commands decoded into owned events.
//!
//! * [`ChatMessage`] - `PRIVMSG`
//! * [`Roomstate`] - `ROOMSTATE`
//! * [`Join`] / [`Part`] - `JOIN` / `PART`
//! * [`Notice`] - `NOTICE`
//!
//! Every other command is left to the caller.
pub mod membership;
pub mod notice;
pub mod privmsg;
pub mod roomstate;

pub use membership::{Join, Membership, Part};
pub use notice::{Notice, NoticeType};
pub use privmsg::{Badge, ChatMessage, Color};
pub use roomstate::{Changed, RoomSettings, Roomstate};

use crate::irc::{self, Command, Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Privmsg(ChatMessage),
    RoomState(Roomstate),
    Join(Join),
    Part(Part),
    Notice(Notice),
}

impl Message {
    /// Parses one raw line, without its `\r\n` terminator.
    ///
    /// Returns `Ok(None)` if the command is not one of the decoded ones.
    pub fn parse(line: &[u8]) -> Result<Option<Message>> { Message::parse_with(line, false) }

    /// Like [`Message::parse`], optionally keeping the raw line on chat
    /// messages.
    pub fn parse_with(line: &[u8], keep_source: bool) -> Result<Option<Message>> {
        let line = as_line(line)?;
        Message::decode(&irc::Message::parse(line), keep_source)
    }

    /// Picks the decoder for an already classified line.
    pub fn decode(msg: &irc::Message<'_>, keep_source: bool) -> Result<Option<Message>> {
        Ok(Some(match msg.cmd {
            Command::Privmsg => Message::Privmsg(ChatMessage::decode(msg, keep_source)?),
            Command::RoomState => Message::RoomState(Roomstate::decode(msg)?),
            Command::Join => Message::Join(membership::decode(msg)?),
            Command::Part => Message::Part(membership::decode(msg)?),
            Command::Notice => Message::Notice(Notice::decode(msg)?),
            _ => return Ok(None),
        }))
    }

    pub fn channel(&self) -> &str {
        match self {
            Message::Privmsg(m) => &m.channel,
            Message::RoomState(m) => &m.channel,
            Message::Join(m) => m.channel(),
            Message::Part(m) => m.channel(),
            Message::Notice(m) => &m.channel,
        }
    }
}

/// Validates UTF-8 and strips any line terminator the transport left behind.
pub(crate) fn as_line(line: &[u8]) -> Result<&str> {
    let line = std::str::from_utf8(line).map_err(|_| Error::InvalidUtf8)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]))
}

/// `#channel` -> `channel`
pub(crate) fn channel_name(param: &str) -> &str { param.strip_prefix('#').unwrap_or(param) }
