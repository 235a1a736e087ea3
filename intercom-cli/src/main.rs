use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use intercom::relay::{DEFAULT_BIND, DEFAULT_KEEP_ALIVE_SECS, RelayConfig, RelayServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod call_client;
mod input;
mod render;

#[derive(Parser)]
#[command(name = "intercom")]
#[command(about = "One-to-one calls over a publish/subscribe signaling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        #[arg(long, default_value_t = DEFAULT_KEEP_ALIVE_SECS)]
        keep_alive_secs: u64,
    },

    /// Join calls from the terminal.
    Call {
        /// Relay origin, e.g. http://localhost:3000
        #[arg(long)]
        relay: String,

        #[arg(long)]
        me: String,

        #[arg(long)]
        peer: Option<String>,

        /// Session settings (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay {
            bind,
            keep_alive_secs,
        } => {
            init_tracing("info");
            let config = RelayConfig {
                bind,
                keep_alive: Duration::from_secs(keep_alive_secs),
            };
            let server = RelayServer::bind(config).await?;
            println!(
                "{}",
                format!("Relay listening on http://{}", server.local_addr()?)
                    .green()
                    .bold()
            );
            server
                .run_until(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }

        Commands::Call {
            relay,
            me,
            peer,
            config,
        } => {
            // Logs would interleave with the transcript
            init_tracing("warn");
            call_client::run(call_client::CallArgs {
                relay,
                me,
                peer,
                config,
            })
            .await?;
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
