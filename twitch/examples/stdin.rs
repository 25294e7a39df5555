//! Pipe raw TMI lines into stdin, e.g. a recorded session:
//!
//! `cargo run --example stdin < session.log`
use tokio_util::sync::CancellationToken;
use twitch_irc::{reader, Capacity, Config, IrcHandler, Sinks};

#[tokio::main]
async fn main() {
    let mut sinks = Sinks::default();
    let chat = sinks.chat_messages.subscribe(Capacity::Bounded(1024));
    let roomstates = sinks.roomstates.subscribe(Capacity::Unbounded);
    let notices = sinks.notices.subscribe(Capacity::Unbounded);
    let handler = IrcHandler::new(Config::default(), sinks);

    let printer = tokio::spawn(async move {
        loop {
            tokio::select! {
                Ok(message) = chat.recv() => {
                    let me = if message.is_action { "* " } else { "" };
                    println!("#{} {}{}: {}", message.channel, me, message.display_name, message.text);
                },
                Ok(state) = roomstates.recv() => println!("#{} roomstate {:?}", state.channel, state),
                Ok(notice) = notices.recv() => println!("#{} notice {:?}: {}", notice.channel, notice.kind, notice.message),
                else => break,
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("CTRL-C");
            ctrl_c.cancel();
        }
    });

    match reader::run(tokio::io::stdin(), &handler, &cancel).await {
        Ok(stats) => println!("{:?}", stats),
        Err(err) => eprintln!("{}", err),
    }
    drop(handler);
    let _ = printer.await;
}
