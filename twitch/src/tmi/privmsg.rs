use std::convert::TryFrom;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use super::channel_name;
use crate::irc::{self, Error, Result, Tags};

const ACTION_START: &str = "\x01ACTION ";
const ACTION_END: char = '\x01';

/// A single `name/level` entry of the `badges` or `badge-info` tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Badge {
    pub name: String,
    pub level: String,
}

impl Badge {
    fn parse(entry: &str) -> Badge {
        let (name, level) = match entry.split_once('/') {
            Some(v) => v,
            None => (entry, ""),
        };
        Badge {
            name: name.into(),
            level: level.into(),
        }
    }
}

/// Comma-separated badge list, e.g. `moderator/1,subscriber/12`.
fn parse_badges(tags: &Tags<'_>, key: &str) -> Vec<Badge> {
    match tags.get_str(key) {
        Some(value) => value.split(',').filter(|v| !v.is_empty()).map(Badge::parse).collect(),
        None => Vec::new(),
    }
}

/// Display color. Users who never picked one get the default (black).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parses `#RRGGBB`.
    pub fn parse(value: &str) -> Option<Color> {
        let hex = value.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        Some(Color {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b) }
}

/// `PRIVMSG`
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub badge_info: Vec<Badge>,
    pub badges: Vec<Badge>,
    pub color: Color,
    pub display_name: String,
    pub first_message: bool,
    pub id: Uuid,
    pub moderator: bool,
    pub subscriber: bool,
    pub turbo: bool,
    pub channel_id: u64,
    /// Milliseconds since the UNIX epoch
    pub sent_ts: u64,
    pub user_id: u64,
    pub username: String,
    /// Lowercase, without the leading `#`
    pub channel: String,
    pub text: String,
    /// `/me` message, sent as CTCP ACTION
    pub is_action: bool,
    /// The raw line, if the handler was configured to keep it
    pub source: Option<String>,
}

impl ChatMessage {
    pub(crate) fn decode(msg: &irc::Message<'_>, keep_source: bool) -> Result<ChatMessage> {
        let tags = &msg.tags;
        let username = msg.nick().ok_or(Error::MissingPrefix)?;
        let channel = msg.params.first().map(channel_name).ok_or(Error::MissingParam("channel"))?;
        let text = msg
            .params
            .trailing()
            .or_else(|| msg.params.get(1))
            .ok_or(Error::MissingParam("message"))?;
        let (text, is_action) = strip_action(text);

        let id = tags.require("id")?;
        let id = parse_id(id.raw()).ok_or_else(|| Error::invalid_tag("id", id))?;

        let color = match tags.get("color") {
            Some(v) if !v.is_empty() => Color::parse(v.raw()).unwrap_or_else(|| {
                log::debug!("Malformed color '{}' on message {}", v.raw(), id);
                Color::default()
            }),
            _ => Color::default(),
        };
        let display_name = match tags.get_str("display-name") {
            Some(name) if !name.is_empty() => name.into_owned(),
            _ => username.to_owned(),
        };

        Ok(ChatMessage {
            badge_info: parse_badges(tags, "badge-info"),
            badges: parse_badges(tags, "badges"),
            color,
            display_name,
            first_message: tags.get_bool("first-msg").unwrap_or(false),
            id,
            moderator: tags.get_bool("mod").unwrap_or(false),
            subscriber: tags.get_bool("subscriber").unwrap_or(false),
            turbo: tags.get_bool("turbo").unwrap_or(false),
            channel_id: tags.get_u64("room-id")?.unwrap_or(0),
            sent_ts: tags.get_u64("tmi-sent-ts")?.unwrap_or(0),
            user_id: tags.get_u64("user-id")?.unwrap_or(0),
            username: username.to_owned(),
            channel: channel.to_ascii_lowercase(),
            text: text.to_owned(),
            is_action,
            source: if keep_source { Some(msg.source.to_owned()) } else { None },
        })
    }

    /// `tmi-sent-ts` as a UTC date/time
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.sent_ts).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    pub fn badge(&self, name: &str) -> Option<&Badge> { self.badges.iter().find(|b| b.name == name) }
}

/// `\x01ACTION text\x01` -> (`text`, true). A missing closing marker means
/// the text is taken as-is.
/// Only the hyphenated `8-4-4-4-12` form; braced, `urn:uuid:` and simple
/// forms are rejected.
fn parse_id(value: &str) -> Option<Uuid> {
    if value.len() != 36 {
        return None;
    }
    Uuid::parse_str(value).ok()
}

fn strip_action(text: &str) -> (&str, bool) {
    match text.strip_prefix(ACTION_START).and_then(|t| t.strip_suffix(ACTION_END)) {
        Some(inner) => (inner, true),
        None => (text, false),
    }
}
