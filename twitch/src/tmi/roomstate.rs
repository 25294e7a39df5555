use std::convert::TryFrom;
use std::ops::{BitOr, BitOrAssign};

use super::channel_name;
use crate::irc::{self, Error, Result, Tags};

/// Which settings a `ROOMSTATE` line actually carried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Changed(u8);

impl Changed {
    pub const EMOTE_ONLY: Changed = Changed(1);
    pub const FOLLOWERS_ONLY: Changed = Changed(1 << 1);
    pub const R9K: Changed = Changed(1 << 2);
    pub const SLOW: Changed = Changed(1 << 3);
    pub const SUBS_ONLY: Changed = Changed(1 << 4);

    pub const fn empty() -> Changed { Changed(0) }

    pub const fn all() -> Changed { Changed(0b1_1111) }

    pub const fn bits(self) -> u8 { self.0 }

    pub const fn contains(self, other: Changed) -> bool { self.0 & other.0 == other.0 }

    pub const fn is_empty(self) -> bool { self.0 == 0 }

    pub fn insert(&mut self, other: Changed) { self.0 |= other.0 }
}

impl BitOr for Changed {
    type Output = Changed;
    fn bitor(self, rhs: Changed) -> Changed { Changed(self.0 | rhs.0) }
}

impl BitOrAssign for Changed {
    fn bitor_assign(&mut self, rhs: Changed) { self.insert(rhs) }
}

/// `ROOMSTATE`
///
/// Twitch sends a full snapshot on join and single-setting updates after
/// that. Fields whose bit is not set in [`Roomstate::changed`] hold
/// placeholder values and say nothing about the room.
#[derive(Clone, Debug, PartialEq)]
pub struct Roomstate {
    pub emote_only: bool,
    /// Minutes a user must follow before chatting, `-1` if disabled
    pub followers_only: i32,
    pub r9k: bool,
    pub channel_id: u64,
    /// Seconds between messages
    pub slow: u32,
    pub subs_only: bool,
    pub channel: String,
    pub changed: Changed,
}

impl Roomstate {
    pub(crate) fn decode(msg: &irc::Message<'_>) -> Result<Roomstate> {
        let tags = &msg.tags;
        let channel_id = tags.require_u64("room-id")?;
        let channel = msg.params.last().map(channel_name).ok_or(Error::MissingParam("channel"))?;

        let mut state = Roomstate {
            emote_only: false,
            followers_only: -1,
            r9k: false,
            channel_id,
            slow: 0,
            subs_only: false,
            channel: channel.to_ascii_lowercase(),
            changed: Changed::empty(),
        };

        if let Some(v) = tags.get_bool("emote-only") {
            state.emote_only = v;
            state.changed |= Changed::EMOTE_ONLY;
        }
        if let Some(v) = tags.get_i64("followers-only")? {
            state.followers_only = narrow(tags, "followers-only", v)?;
            state.changed |= Changed::FOLLOWERS_ONLY;
        }
        if let Some(v) = tags.get_bool("r9k") {
            state.r9k = v;
            state.changed |= Changed::R9K;
        }
        if let Some(v) = tags.get_u64("slow")? {
            state.slow = narrow(tags, "slow", v)?;
            state.changed |= Changed::SLOW;
        }
        if let Some(v) = tags.get_bool("subs-only") {
            state.subs_only = v;
            state.changed |= Changed::SUBS_ONLY;
        }

        Ok(state)
    }

    /// True if this line carried every setting.
    pub fn is_snapshot(&self) -> bool { self.changed.contains(Changed::all()) }
}

fn narrow<T, N>(tags: &Tags<'_>, key: &str, value: N) -> Result<T>
where
    T: TryFrom<N>,
{
    T::try_from(value).map_err(|_| match tags.get(key) {
        Some(raw) => Error::invalid_tag(key, raw),
        None => Error::MissingTag(key.into()),
    })
}

/// Accumulated room settings on the consumer side.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSettings {
    pub emote_only: bool,
    pub followers_only: i32,
    pub r9k: bool,
    pub slow: u32,
    pub subs_only: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        RoomSettings {
            emote_only: false,
            followers_only: -1,
            r9k: false,
            slow: 0,
            subs_only: false,
        }
    }
}

impl RoomSettings {
    /// Overwrites only the settings `update` actually carried.
    pub fn apply(&mut self, update: &Roomstate) {
        let changed = update.changed;
        if changed.contains(Changed::EMOTE_ONLY) {
            self.emote_only = update.emote_only;
        }
        if changed.contains(Changed::FOLLOWERS_ONLY) {
            self.followers_only = update.followers_only;
        }
        if changed.contains(Changed::R9K) {
            self.r9k = update.r9k;
        }
        if changed.contains(Changed::SLOW) {
            self.slow = update.slow;
        }
        if changed.contains(Changed::SUBS_ONLY) {
            self.subs_only = update.subs_only;
        }
    }
}
