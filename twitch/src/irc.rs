use std::borrow::Cow;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::ops::Deref;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
    #[error("Missing prefix")]
    MissingPrefix,
    #[error("Missing parameter '{0}'")]
    MissingParam(&'static str),
    #[error("Expected tag '{0}'")]
    MissingTag(String),
    #[error("Invalid value '{value}' for tag '{key}'")]
    InvalidTag { key: String, value: String },
}

impl Error {
    pub(crate) fn invalid_tag(key: &str, value: TagValue<'_>) -> Error {
        Error::InvalidTag {
            key: key.into(),
            value: value.raw().into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq)]
pub struct Message<'a> {
    pub tags: Tags<'a>,
    pub prefix: Option<Prefix<'a>>,
    pub cmd: Command<'a>,
    pub params: Params<'a>,
    pub source: &'a str,
}

impl<'a> Message<'a> {
    /// Parse a raw IRC Message
    ///
    /// Twitch-specific quirks are accepted, such as nick-only prefixes
    /// being host-only. A line without a command yields
    /// `Command::Unknown("")` rather than an error.
    pub fn parse(source: &'a str) -> Message<'a> {
        let (tags, remainder) = Tags::parse(source);
        let (prefix, remainder) = Prefix::parse(remainder);
        let (cmd, remainder) = Command::parse(remainder);
        let params = Params::parse(remainder);

        Message {
            tags,
            prefix,
            cmd,
            params,
            source,
        }
    }

    /// The `nick` part of the prefix, if there is one.
    pub fn nick(&self) -> Option<&'a str> { self.prefix.and_then(|p| p.nick) }

    /// The first middle parameter that looks like a `#channel`, without the
    /// `#`. Message text is never taken for a channel.
    pub fn channel(&self) -> Option<&'a str> { self.params.middle.iter().find_map(|p| p.strip_prefix('#')) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command<'a> {
    Ping,
    Pong,
    /// Join channel
    Join,
    /// Leave channel
    Part,
    /// Twitch Private Message
    Privmsg,
    // Twitch extensions
    /// Send message to a single user
    Whisper,
    /// Purge a user's messages
    Clearchat,
    /// Single message removal
    Clearmsg,
    /// Sent upon successful authentication (PASS/NICK command)
    GlobalUserState,
    /// Channel starts or stops host mode
    HostTarget,
    /// General notices from the server
    Notice,
    /// Rejoins channels after a restart
    Reconnect,
    /// Identifies the channel's chat settings
    RoomState,
    /// Announces Twitch-specific events to the channel
    UserNotice,
    /// Identifies a user's chat settings or properties
    UserState,
    /// Requesting an IRC capability
    Capability,
    /// Unknown command, including numerics such as `001` or `353`
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a Twitch IRC command. Matching is case-sensitive.
    ///
    /// Returns (command, remainder)
    pub fn parse(data: &'a str) -> (Command<'a>, &'a str) {
        use Command::*;
        let data = data.trim_start_matches(' ');
        let end = match data.find(' ') {
            Some(v) => v,
            None => data.len(),
        };
        let cmd = match &data[..end] {
            "PING" => Ping,
            "PONG" => Pong,
            "JOIN" => Join,
            "PART" => Part,
            "PRIVMSG" => Privmsg,
            "WHISPER" => Whisper,
            "CLEARCHAT" => Clearchat,
            "CLEARMSG" => Clearmsg,
            "GLOBALUSERSTATE" => GlobalUserState,
            "HOSTTARGET" => HostTarget,
            "NOTICE" => Notice,
            "RECONNECT" => Reconnect,
            "ROOMSTATE" => RoomState,
            "USERNOTICE" => UserNotice,
            "USERSTATE" => UserState,
            "CAP" => Capability,
            other => Unknown(other),
        };

        (cmd, &data[end..])
    }

    pub fn as_str(&self) -> &'a str {
        use Command::*;
        match *self {
            Ping => "PING",
            Pong => "PONG",
            Join => "JOIN",
            Part => "PART",
            Privmsg => "PRIVMSG",
            Whisper => "WHISPER",
            Clearchat => "CLEARCHAT",
            Clearmsg => "CLEARMSG",
            GlobalUserState => "GLOBALUSERSTATE",
            HostTarget => "HOSTTARGET",
            Notice => "NOTICE",
            Reconnect => "RECONNECT",
            RoomState => "ROOMSTATE",
            UserNotice => "USERNOTICE",
            UserState => "USERSTATE",
            Capability => "CAP",
            Unknown(other) => other,
        }
    }
}

/// A tag value as it appears on the wire.
///
/// Escape sequences are only resolved when [`TagValue::unescaped`] is
/// called, so tags nobody reads cost nothing beyond the span itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagValue<'a>(&'a str);

impl<'a> TagValue<'a> {
    /// The still-escaped value.
    pub fn raw(&self) -> &'a str { self.0 }

    pub fn as_bytes(&self) -> &'a [u8] { self.0.as_bytes() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Resolves `\s`, `\:`, `\\`, `\r` and `\n`.
    ///
    /// Values without escapes are returned borrowed. A value containing an
    /// unknown escape or a dangling `\` is returned raw.
    pub fn unescaped(&self) -> Cow<'a, str> {
        if !self.0.contains('\\') {
            return Cow::Borrowed(self.0);
        }
        match unescape(self.0) {
            Some(value) => Cow::Owned(value),
            None => {
                log::debug!("Passing through tag value with invalid escapes: {}", self.0);
                Cow::Borrowed(self.0)
            }
        }
    }
}

fn unescape(value: &str) -> Option<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            ':' => ';',
            's' => ' ',
            '\\' => '\\',
            'r' => '\r',
            'n' => '\n',
            _ => return None,
        });
    }
    Some(out)
}

/// Parses an unsigned decimal number straight from its bytes.
pub fn parse_u64(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0u64, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    })
}

/// Like [`parse_u64`], with an optional leading `-`.
pub fn parse_i64(bytes: &[u8]) -> Option<i64> {
    match bytes.split_first() {
        Some((b'-', digits)) => parse_u64(digits).and_then(|v| i64::try_from(v).ok()).map(|v| -v),
        _ => parse_u64(bytes).and_then(|v| i64::try_from(v).ok()),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tags<'a>(HashMap<&'a str, TagValue<'a>>);

impl<'a> Deref for Tags<'a> {
    type Target = HashMap<&'a str, TagValue<'a>>;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> Tags<'a> {
    /// Parses IRC tags in the form
    ///
    /// `@key0=[value0];key1=[value1];...;keyN-1=[valueN-1];keyN=[valueN] `
    ///
    /// `[value]`s are optional, and so is the `=`. If a key appears more
    /// than once, the last occurrence wins. Input without a leading `@` has
    /// no tags.
    ///
    /// Returns (tags, remainder)
    pub fn parse(data: &'a str) -> (Tags<'a>, &'a str) {
        let data = match data.strip_prefix('@') {
            Some(v) => v,
            None => return (Tags::default(), data),
        };
        let (block, remainder) = match data.find(' ') {
            Some(end) => (&data[..end], &data[end + 1..]),
            None => (data, ""),
        };

        let mut map = HashMap::new();
        for pair in block.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some(kv) => kv,
                None => (pair, ""),
            };
            map.insert(key, TagValue(value));
        }

        (Tags(map), remainder)
    }

    pub fn get(&self, key: &str) -> Option<TagValue<'a>> { self.0.get(key).copied() }

    /// The unescaped value of `key`.
    pub fn get_str(&self, key: &str) -> Option<Cow<'a, str>> { self.get(key).map(|v| v.unescaped()) }

    /// Parses a numeric bool; only `1` is true.
    pub fn get_bool(&self, key: &str) -> Option<bool> { self.get(key).map(|v| v.raw() == "1") }

    /// Parses an unsigned number. A present but malformed value is an error.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            Some(v) => parse_u64(v.as_bytes())
                .map(Some)
                .ok_or_else(|| Error::invalid_tag(key, v)),
            None => Ok(None),
        }
    }

    /// Parses a signed number. A present but malformed value is an error.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            Some(v) => parse_i64(v.as_bytes())
                .map(Some)
                .ok_or_else(|| Error::invalid_tag(key, v)),
            None => Ok(None),
        }
    }

    /// Like `.get()`, but returns an `Error` in case the key doesn't exist
    pub fn require(&self, key: &str) -> Result<TagValue<'a>> {
        self.get(key).ok_or_else(|| Error::MissingTag(key.into()))
    }

    /// Like `.get_u64()`, but returns an `Error` in case the key doesn't
    /// exist
    pub fn require_u64(&self, key: &str) -> Result<u64> {
        self.get_u64(key)?.ok_or_else(|| Error::MissingTag(key.into()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prefix<'a> {
    pub nick: Option<&'a str>,
    pub user: Option<&'a str>,
    pub host: &'a str,
}

impl<'a> Prefix<'a> {
    /// Parses an optional IRC prefix in one of the following forms:
    ///
    /// * `:host`
    /// * `:nick@host`
    /// * `:nick!user@host`
    ///
    /// Returns (prefix, remainder)
    pub fn parse(data: &'a str) -> (Option<Prefix<'a>>, &'a str) {
        let data = data.trim_start_matches(' ');
        let data = match data.strip_prefix(':') {
            Some(v) => v,
            None => return (None, data),
        };
        let end = match data.find(' ') {
            Some(end) => end,
            None => data.len(),
        };
        let prefix = &data[..end];

        // on twitch, nick-only is actually host-only (because they're not fully
        // compliant with RFC2812) so in case we don't find '@', we treat
        // the prefix as just the 'host' part
        let (nick, user, host) = match prefix.split_once('@') {
            Some((nick_and_user, host)) => match nick_and_user.split_once('!') {
                // case: 'nick!user@host'
                Some((nick, user)) => (Some(nick), Some(user), host),
                // case: 'nick@host'
                None => (Some(nick_and_user), None, host),
            },
            // case: 'host'
            None => (None, None, prefix),
        };

        (Some(Prefix { nick, user, host }), &data[end..])
    }
}

/// Middle parameters plus the optional `:trailing` one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params<'a> {
    pub middle: Vec<&'a str>,
    pub trailing: Option<&'a str>,
}

impl<'a> Params<'a> {
    /// Parse a params list
    ///
    /// Valid form: `param0 param1 ... paramN [:trailing with spaces]`
    pub fn parse(data: &'a str) -> Params<'a> {
        let mut middle = Vec::new();
        let mut trailing = None;
        let mut rest = data.trim_start_matches(' ');
        while !rest.is_empty() {
            if let Some(t) = rest.strip_prefix(':') {
                trailing = Some(t);
                break;
            }
            let (param, remainder) = match rest.find(' ') {
                Some(end) => rest.split_at(end),
                None => (rest, ""),
            };
            middle.push(param);
            rest = remainder.trim_start_matches(' ');
        }

        Params { middle, trailing }
    }

    /// All parameters in order, trailing last.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ { self.middle.iter().copied().chain(self.trailing) }

    pub fn get(&self, index: usize) -> Option<&'a str> { self.iter().nth(index) }

    pub fn first(&self) -> Option<&'a str> { self.get(0) }

    pub fn last(&self) -> Option<&'a str> { self.trailing.or_else(|| self.middle.last().copied()) }

    pub fn trailing(&self) -> Option<&'a str> { self.trailing }

    pub fn len(&self) -> usize { self.middle.len() + self.trailing.is_some() as usize }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
