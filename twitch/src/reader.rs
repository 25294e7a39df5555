//! Feeds an [`IrcHandler`] from anything that yields `\r\n`-terminated lines
//!
//! Connecting, authenticating and reconnecting are up to the caller; this
//! only reads lines until the stream ends or the token is cancelled.
use futures::StreamExt;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_util::sync::CancellationToken;

use crate::handler::{IrcHandler, Stats};

#[allow(clippy::upper_case_acronyms)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Encountered an I/O error: {0}")]
    IO(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads lines from `reader` into `handler` until EOF or cancellation.
///
/// Events go out through [`IrcHandler::handle`], so a subscriber with a full
/// queue loses events instead of holding up the read loop and the other
/// sinks. Lines that fail to decode are logged and skipped.
pub async fn run<R>(reader: R, handler: &IrcHandler, cancel: &CancellationToken) -> Result<Stats>
where
    R: AsyncRead + Unpin,
{
    let mut lines = LinesStream::new(BufReader::new(reader).lines());

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next() => match line {
                Some(line) => line?,
                None => break,
            },
        };
        log::trace!("> {}", line);
        if let Err(err) = handler.handle(line.as_bytes()) {
            log::warn!("Failed to decode line ({}): {}", err, line);
        }
    }

    let stats = handler.stats();
    log::debug!("Line feed finished: {:?}", stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::handler::Config;
    use crate::sink::{Capacity, Sinks};

    #[test]
    fn feeds_every_line() {
        let mut sinks = Sinks::default();
        let roomstates = sinks.roomstates.subscribe(Capacity::Unbounded);
        let joins = sinks.joins.subscribe(Capacity::Unbounded);
        let handler = IrcHandler::new(Config::default(), sinks);

        let reader = tokio_test::io::Builder::new()
            .read(b":tmi.twitch.tv 001 justinfan123 :Welcome, GLHF!\r\n")
            .read(b":justinfan123!justinfan123@justinfan123.tmi.twitch.tv JOIN #pajlada\r\n")
            .read(b"@emote-only=0;followers-only=-1;r9k=0;room-id=11148817;slow=0;subs-only=0 ")
            .read(b":tmi.twitch.tv ROOMSTATE #pajlada\r\n")
            .read(b":tmi.twitch.tv PRIVMSG #pajlada :no id\r\n")
            .read(b"PING :tmi.twitch.tv\r\n")
            .build();
        let stats = tokio_test::block_on(run(reader, &handler, &CancellationToken::new())).unwrap();

        assert_eq!(
            Stats {
                handled: 2,
                ignored: 2,
                malformed: 1,
                dropped: 0
            },
            stats
        );
        assert_eq!("pajlada", joins.try_recv().unwrap().channel);
        assert_eq!(11148817, roomstates.try_recv().unwrap().channel_id);
    }

    #[test]
    fn full_chat_queue_does_not_hold_back_roomstates() {
        let mut sinks = Sinks::default();
        let chat = sinks.chat_messages.subscribe(Capacity::Bounded(1));
        let roomstates = sinks.roomstates.subscribe(Capacity::Unbounded);
        let handler = IrcHandler::new(Config::default(), sinks);

        let reader = tokio_test::io::Builder::new()
            .read(b"@id=e9d998c3-36f1-430f-89ec-6b887c28af36 :a!a@a.tmi.twitch.tv PRIVMSG #pajlada :one\r\n")
            .read(b"@id=4a3d5b2e-8c1f-4e7a-9b6d-0f2e1c3a5b7d :a!a@a.tmi.twitch.tv PRIVMSG #pajlada :two\r\n")
            .read(b"@room-id=11148817;slow=10 :tmi.twitch.tv ROOMSTATE #pajlada\r\n")
            .build();
        let stats = tokio_test::block_on(run(reader, &handler, &CancellationToken::new())).unwrap();

        assert_eq!(
            Stats {
                handled: 3,
                ignored: 0,
                malformed: 0,
                dropped: 1
            },
            stats
        );
        assert_eq!(10, roomstates.try_recv().unwrap().slow);
        assert_eq!("one", chat.try_recv().unwrap().text);
        assert!(chat.try_recv().is_err());
    }

    #[test]
    fn stops_when_cancelled() {
        let handler = IrcHandler::new(Config::default(), Sinks::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let reader = tokio_test::io::Builder::new().build();
        let stats = tokio_test::block_on(run(reader, &handler, &cancel)).unwrap();
        assert_eq!(Stats::default(), stats);
    }
}
