//! CLI entry point for caravel

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "caravel")]
#[command(version = "0.1.0")]
#[command(about = "A static blog generator backed by a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate static pages for every known slug
    #[command(alias = "g")]
    Generate {
        /// Regenerate pages even when still within the revalidation window
        #[arg(short, long)]
        force: bool,
    },

    /// Start the server; unknown slugs are generated on demand
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder and cache
    Clean,

    /// List known slugs and their generation status
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "caravel=debug,info"
    } else {
        "caravel=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Generate { force } => {
            let caravel = caravel::Caravel::new(&base_dir)?;
            tracing::info!("Generating static pages...");

            caravel::commands::generate::run(&caravel, force).await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let caravel = caravel::Caravel::new(&base_dir)?;

            // Generate first so known slugs are served from disk
            tracing::info!("Generating static pages...");
            caravel.generate().await?;

            let port = port.unwrap_or(caravel.config.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            caravel::server::start(&caravel, &ip, port).await?;
        }

        Commands::Clean => {
            let caravel = caravel::Caravel::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            caravel.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let caravel = caravel::Caravel::new(&base_dir)?;
            caravel::commands::list::run(&caravel).await?;
        }

        Commands::Version => {
            println!("caravel version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
