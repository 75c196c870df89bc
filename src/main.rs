//! fileb64 - file <-> base64 exchange server
//!
//! CLI entry point

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fileb64::{ServerConfig, WebServer};

#[derive(Parser)]
#[command(name = "fileb64", version, about = "File to base64 exchange web server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Port to listen on (falls back to the PORT environment variable,
    /// then 3000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Request body limit in megabytes
    #[arg(long, default_value_t = 50)]
    body_limit: usize,

    /// Directory for transient files
    #[arg(long, default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Directory holding the static forms and stylesheet
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => run_serve(&args),
    }
}

fn run_serve(args: &ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()
        .with_bind(&args.bind)
        .with_body_limit(args.body_limit * 1024 * 1024)
        .with_uploads_dir(&args.uploads_dir)
        .with_public_dir(&args.public_dir);

    // CLI takes precedence over the environment
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let server = WebServer::with_config(config);
        server.run().await.map_err(|e| anyhow!(e))
    })?;

    Ok(())
}
