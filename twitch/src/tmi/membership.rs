use super::channel_name;
use crate::irc::{self, Error, Result};

/// Shared shape of `JOIN` and `PART`.
///
/// The two only differ in meaning, so [`decode`] builds either one through
/// [`Membership::new`].
pub trait Membership: Sized {
    fn new(username: String, channel: String) -> Self;
    fn username(&self) -> &str;
    fn channel(&self) -> &str;
}

macro_rules! membership_event {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            pub username: String,
            /// Lowercase, without the leading `#`
            pub channel: String,
        }

        impl Membership for $name {
            fn new(username: String, channel: String) -> Self { $name { username, channel } }

            fn username(&self) -> &str { &self.username }

            fn channel(&self) -> &str { &self.channel }
        }
    };
}

membership_event!(
    /// `JOIN`
    Join
);
membership_event!(
    /// `PART`
    Part
);

/// `:<user>!<user>@<user>.tmi.twitch.tv JOIN #<channel>`
pub fn decode<M: Membership>(msg: &irc::Message<'_>) -> Result<M> {
    let username = msg.nick().ok_or(Error::MissingPrefix)?;
    let channel = msg.params.last().map(channel_name).ok_or(Error::MissingParam("channel"))?;
    Ok(M::new(username.to_owned(), channel.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_join() {
        let msg = irc::Message::parse(":strbhlfe!strbhlfe@strbhlfe.tmi.twitch.tv JOIN #lbnshlfe");
        assert_eq!(
            Join {
                username: "strbhlfe".into(),
                channel: "lbnshlfe".into()
            },
            decode::<Join>(&msg).unwrap()
        );
    }

    #[test]
    fn decode_part() {
        let msg = irc::Message::parse(":strbhlfe!strbhlfe@strbhlfe.tmi.twitch.tv PART #lbnshlfe");
        let part: Part = decode(&msg).unwrap();
        assert_eq!("strbhlfe", part.username());
        assert_eq!("lbnshlfe", part.channel());
    }

    #[test]
    fn host_only_prefix_is_an_error() {
        let msg = irc::Message::parse(":tmi.twitch.tv JOIN #lbnshlfe");
        assert_eq!(Err(Error::MissingPrefix), decode::<Join>(&msg));
    }
}
