// Tamu CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json output for scripting.
// Design Decision: The live display runs here too - same binary operators
//   already have on the venue machine.

mod client;
mod commands;
mod output;
mod reveal;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tamu")]
#[command(about = "Tamu CLI - Manage events and run the live guest display")]
#[command(version)]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "TAMU_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage events
    Events {
        #[command(subcommand)]
        command: commands::events::EventsCommand,
    },

    /// Export an event's attendance as CSV
    Export {
        /// Event ID
        #[arg(long, short)]
        event: i64,

        /// Write to this file instead of stdout
        #[arg(long, short = 'f')]
        out_file: Option<String>,

        /// Exact institution filter
        #[arg(long)]
        institution: Option<String>,
    },

    /// Run the live guest display for one event
    Display {
        /// Event slug
        slug: String,

        /// Seconds between reveals of queued check-ins
        #[arg(long, default_value = "15")]
        reveal_interval: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = client::Client::new(&cli.api_url);
    let output = output::OutputFormat::from_str(&cli.output);

    match cli.command {
        Commands::Events { command } => {
            commands::events::run(&client, output, command).await?;
        }
        Commands::Export {
            event,
            out_file,
            institution,
        } => {
            commands::export::run(&client, cli.quiet, event, out_file, institution).await?;
        }
        Commands::Display {
            slug,
            reveal_interval,
        } => {
            commands::display::run(&client, cli.quiet, &slug, reveal_interval).await?;
        }
    }

    Ok(())
}
