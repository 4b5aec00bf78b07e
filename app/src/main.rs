#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;
mod runtime;

use clap::{Parser, Subcommand};
use command::{
    ChatInput, ChatStrategy, CommandStrategy, InfoStrategy, InitStrategy, ServeInput, ServeStrategy,
    VersionStrategy,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mnemod")]
#[command(about = "memory-augmented conversation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP surface
    Serve {
        /// Overrides the configured HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides the configured PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one conversation turn (or an interactive REPL) against the
    /// orchestrator directly, bypassing the HTTP surface
    Chat {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        session_id: String,
        #[arg(long, default_value = "default")]
        role_id: String,
        /// Single message to send; omit for an interactive REPL
        #[arg(short = 'm', long)]
        message: Option<String>,
    },
    /// Print effective configuration
    Info,
    /// Write a `.env` template and create the `DATA_DIR` layout
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => ServeStrategy.execute(ServeInput { host, port }).await?,
        Commands::Chat { user_id, session_id, role_id, message } => {
            ChatStrategy.execute(ChatInput { user_id, session_id, role_id, message }).await?;
        }
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Init => InitStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
