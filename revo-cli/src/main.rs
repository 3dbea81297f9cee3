//! Revo Touch CLI
//!
//! Book design services, pay for them and follow their progress from the
//! terminal.

mod commands;
mod config;
mod gateway;
mod media;
mod shutdown;
mod terminal;

use clap::{Parser, Subcommand};
use commands::{VoiceArg, parse_voice};
use config::ConfigLoader;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Revo Touch - design service bookings
#[derive(Parser, Debug)]
#[command(name = "revo")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./revo-config.toml", global = true)]
    config: PathBuf,

    /// Override the backend base URL
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// Override the customer email
    #[arg(long, env = "REVO_CUSTOMER_EMAIL", global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the services and their prices
    Services,

    /// Book and pay for one or more services
    Book {
        /// Service to book (repeatable)
        #[arg(short, long = "option", required = true)]
        options: Vec<String>,

        /// What the design should look like
        #[arg(short, long)]
        description: String,

        /// Reference image (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        /// Voice note as `path[=seconds]` (repeatable)
        #[arg(long = "voice", value_parser = parse_voice)]
        voices: Vec<VoiceArg>,
    },

    /// List your orders
    Orders,

    /// Show the progress of an order
    Status { order_id: String },

    /// Show the preview image of an order
    Preview {
        order_id: String,

        /// Save the image into the configured download directory
        #[arg(long)]
        download: bool,
    },

    /// Request changes to a design
    Update {
        order_id: String,

        /// Requested changes
        #[arg(short, long)]
        description: String,

        /// Voice note as `path[=seconds]` (repeatable)
        #[arg(long = "voice", value_parser = parse_voice)]
        voices: Vec<VoiceArg>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    if let Command::Services = args.command {
        commands::services();
        return Ok(());
    }

    let config_loader = ConfigLoader::new(&args.config, args.base_url, args.email);
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    match args.command {
        Command::Services => Ok(()),
        Command::Book {
            options,
            description,
            images,
            voices,
        } => commands::book(config, options, description, images, voices).await,
        Command::Orders => commands::orders(config).await,
        Command::Status { order_id } => commands::status(config, order_id).await,
        Command::Preview { order_id, download } => {
            commands::preview(config, order_id, download).await
        }
        Command::Update {
            order_id,
            description,
            voices,
        } => commands::update(config, order_id, description, voices).await,
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
