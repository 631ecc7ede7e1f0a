//! Console front-end for the dicerelay chat bot.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dr",
    about = "dicerelay: a BCDice chat bot you can drive from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot on stdin as if it were a channel
    Console {
        /// BCDice-API server URL
        server: String,

        /// User id the messages are sent as
        #[arg(short, long, default_value = "console")]
        user: String,

        /// Display name the messages are sent as
        #[arg(short, long, default_value = "Player")]
        name: String,

        /// Channel id the messages are posted in
        #[arg(short, long, default_value = "console")]
        channel: String,

        /// Stay silent when the server rejects a command
        #[arg(long)]
        ignore_errors: bool,
    },

    /// Roll a single command and print the result
    Roll {
        /// BCDice-API server URL
        server: String,

        /// The dice command, e.g. 2d6+1
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,

        /// Game system to roll with
        #[arg(short, long)]
        system: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Console {
            server,
            user,
            name,
            channel,
            ignore_errors,
        } => commands::console::run(&server, &user, &name, &channel, ignore_errors).await,
        Commands::Roll {
            server,
            command,
            system,
        } => commands::roll::run(&server, &command.join(" "), system.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
