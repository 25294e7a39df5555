use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use twitch_irc::{Capacity, Changed, Config, Error, IrcHandler, Join, NoticeType, Part, Sinks, Stats};

const PRIVMSG: &str = "\
    @badge-info=;badges=broadcaster/1;color=#FF4500;display-name=Strbhlfe;emotes=;first-msg=1;flags=;\
    id=7eb848c9-1060-4e5e-9f4c-612877982e79;mod=0;room-id=87633910;subscriber=0;tmi-sent-ts=1616349493418;\
    turbo=1;user-id=87633910;user-type= :strbhlfe!strbhlfe@strbhlfe.tmi.twitch.tv PRIVMSG #strbhlfe :peepoHey";

#[test]
fn every_type_reaches_its_own_sink() {
    let mut sinks = Sinks::default();
    let chat = sinks.chat_messages.subscribe(Capacity::Unbounded);
    let roomstates = sinks.roomstates.subscribe(Capacity::Unbounded);
    let joins = sinks.joins.subscribe(Capacity::Unbounded);
    let parts = sinks.parts.subscribe(Capacity::Unbounded);
    let notices = sinks.notices.subscribe(Capacity::Unbounded);
    let handler = IrcHandler::new(Config::default(), sinks);

    let lines = [
        PRIVMSG,
        "@emote-only=1;followers-only=15;r9k=1;room-id=87633910;slow=10;subs-only=1 :tmi.twitch.tv ROOMSTATE #strbhlfe",
        ":strbhlfe!strbhlfe@strbhlfe.tmi.twitch.tv JOIN #lbnshlfe",
        ":strbhlfe!strbhlfe@strbhlfe.tmi.twitch.tv PART #lbnshlfe",
        "@msg-id=already_emote_only_off :tmi.twitch.tv NOTICE #lbnshlfe :This room is not in emote-only mode.",
    ];
    for line in &lines {
        assert_eq!(Ok(true), handler.handle(line.as_bytes()), "{}", line);
    }

    let message = chat.try_recv().unwrap();
    assert_eq!("strbhlfe", message.username);
    assert_eq!("Strbhlfe", message.display_name);
    assert_eq!("peepoHey", message.text);
    assert_eq!(87633910, message.channel_id);
    assert_eq!(87633910, message.user_id);
    assert_eq!(1616349493418, message.sent_ts);
    assert!(message.first_message);
    assert!(message.turbo);
    assert!(!message.moderator);
    assert_eq!("1", message.badge("broadcaster").unwrap().level);
    assert_eq!("#FF4500", message.color.to_string());

    let state = roomstates.try_recv().unwrap();
    assert!(state.emote_only);
    assert_eq!(15, state.followers_only);
    assert!(state.r9k);
    assert_eq!(87633910, state.channel_id);
    assert_eq!(10, state.slow);
    assert!(state.subs_only);
    assert_eq!("strbhlfe", state.channel);
    assert_eq!(Changed::all(), state.changed);

    assert_eq!(
        Join {
            username: "strbhlfe".into(),
            channel: "lbnshlfe".into()
        },
        joins.try_recv().unwrap()
    );
    assert_eq!(
        Part {
            username: "strbhlfe".into(),
            channel: "lbnshlfe".into()
        },
        parts.try_recv().unwrap()
    );

    let notice = notices.try_recv().unwrap();
    assert_eq!(NoticeType::AlreadyEmoteOnlyOff, notice.kind);
    assert_eq!("lbnshlfe", notice.channel);
    assert_eq!("This room is not in emote-only mode.", notice.message);

    assert!(chat.is_empty() && roomstates.is_empty() && joins.is_empty() && parts.is_empty() && notices.is_empty());
}

#[test]
fn unrecognized_command_touches_no_sink() {
    let mut sinks = Sinks::default();
    let chat = sinks.chat_messages.subscribe(Capacity::Unbounded);
    let notices = sinks.notices.subscribe(Capacity::Unbounded);
    let handler = IrcHandler::new(Config::default(), sinks);

    assert_eq!(Ok(false), handler.handle(b"PING :tmi.twitch.tv"));
    assert!(chat.is_empty());
    assert!(notices.is_empty());
    assert_eq!(1, handler.stats().ignored);
}

#[test]
fn malformed_line_leaves_handler_usable() {
    let mut sinks = Sinks::default();
    let chat = sinks.chat_messages.subscribe(Capacity::Unbounded);
    let handler = IrcHandler::new(Config::default(), sinks);

    let broken = PRIVMSG.replace("7eb848c9-1060-4e5e-9f4c-612877982e79", "7eb848c9");
    assert_eq!(
        Err(Error::InvalidTag {
            key: "id".into(),
            value: "7eb848c9".into()
        }),
        handler.handle(broken.as_bytes())
    );
    assert!(chat.is_empty());
    assert_eq!(Ok(true), handler.handle(PRIVMSG.as_bytes()));
    assert_eq!(1, chat.len());
}

#[test]
fn same_line_twice_gives_equal_events() {
    let mut sinks = Sinks::default();
    let chat = sinks.chat_messages.subscribe(Capacity::Unbounded);
    let handler = IrcHandler::new(Config::default(), sinks);

    handler.handle(PRIVMSG.as_bytes()).unwrap();
    handler.handle(PRIVMSG.as_bytes()).unwrap();
    assert_eq!(chat.try_recv().unwrap(), chat.try_recv().unwrap());
}

#[test]
fn lines_are_parsed_without_subscribers() {
    let handler = IrcHandler::new(Config::default(), Sinks::default());
    assert_eq!(Ok(true), handler.handle(PRIVMSG.as_bytes()));
    assert!(handler.handle(b"@id=nope :a!a@a PRIVMSG #a :hi").is_err());
    assert_eq!(
        Stats {
            handled: 1,
            ignored: 0,
            malformed: 1,
            dropped: 0
        },
        handler.stats()
    );
}

#[test]
fn handler_is_shared_across_threads() {
    let mut sinks = Sinks::default();
    let joins = sinks.joins.subscribe(Capacity::Unbounded);
    let handler = Arc::new(IrcHandler::new(Config::default(), sinks));

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                for _ in 0..25 {
                    let line = format!(":user{0}!user{0}@user{0}.tmi.twitch.tv JOIN #chan", i);
                    assert_eq!(Ok(true), handler.handle(line.as_bytes()));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(100, joins.len());
    assert_eq!(100, handler.stats().handled);
}

#[test]
fn slow_consumer_does_not_stall_other_types() {
    let mut sinks = Sinks::default();
    let _stalled_chat = sinks.chat_messages.subscribe(Capacity::Bounded(1));
    let roomstates = sinks.roomstates.subscribe(Capacity::Bounded(8));
    let handler = IrcHandler::new(Config::default(), sinks);

    for _ in 0..5 {
        handler.handle(PRIVMSG.as_bytes()).unwrap();
    }
    handler
        .handle(b"@room-id=87633910;slow=30 :tmi.twitch.tv ROOMSTATE #strbhlfe")
        .unwrap();

    assert_eq!(4, handler.sinks().chat_messages.dropped());
    let state = roomstates.try_recv().unwrap();
    assert_eq!(Changed::SLOW, state.changed);
    assert_eq!(30, state.slow);
}
