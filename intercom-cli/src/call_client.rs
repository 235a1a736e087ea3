use anyhow::{Context, Result};
use colored::*;
use intercom::client::{
    CallError, CallSession, ParticipantId, RelayTransport, SessionConfig, SignalTransport,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::input::{HELP, Input, parse};
use crate::render::StatePrinter;

pub struct CallArgs {
    pub relay: String,
    pub me: String,
    pub peer: Option<String>,
    pub config: Option<PathBuf>,
}

/// Interactive terminal call client. Returns when the user quits or stdin closes.
pub async fn run(args: CallArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let transport: Arc<dyn SignalTransport> = Arc::new(RelayTransport::new(&args.relay));
    let session = CallSession::builder(args.me.as_str(), transport)
        .config(config)
        .spawn();
    info!("Connected to relay {} as {}", args.relay, args.me);

    println!("{}", format!("intercom: {} via {}", args.me, args.relay).green().bold());
    println!("{}", "type /help for commands".dimmed());

    let printer = spawn_printer(&session);

    if let Some(peer) = args.peer {
        session.select_peer(Some(ParticipantId::from(peer))).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let input = parse(&line);
        if input == Input::Quit {
            break;
        }
        if let Err(e) = dispatch(&session, input).await {
            println!("{}", e.to_string().red());
            if matches!(e, CallError::Closed) {
                break;
            }
        }
    }

    session.close().await;
    printer.abort();
    println!("{}", "bye".dimmed());
    Ok(())
}

async fn dispatch(session: &CallSession, input: Input) -> Result<(), CallError> {
    match input {
        Input::Peer(peer) => {
            session.select_peer(peer.map(ParticipantId::from)).await?;
        }
        Input::Call => session.start_call().await?,
        Input::End => session.end_call().await?,
        Input::Mute => {
            session.toggle_audio().await?;
        }
        Input::Video => {
            session.toggle_video().await?;
        }
        Input::Share => session.start_screen_share().await?,
        Input::Unshare => session.stop_screen_share().await?,
        Input::Chat(text) => session.send_message(text).await?,
        Input::Help => println!("{}", HELP),
        Input::Unknown(name) => println!("{}", format!("unknown command /{}", name).red()),
        Input::Quit | Input::Empty => {}
    }
    Ok(())
}

/// Print state changes as they happen.
fn spawn_printer(session: &CallSession) -> tokio::task::JoinHandle<()> {
    let mut watch = session.watch();
    let mut printer = StatePrinter::new(session.self_id().clone(), watch.borrow().clone());

    tokio::spawn(async move {
        while watch.changed().await.is_ok() {
            let state = watch.borrow_and_update().clone();
            for line in printer.update(&state) {
                println!("{}", line);
            }
        }
    })
}
