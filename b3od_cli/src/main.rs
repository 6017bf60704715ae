mod commands;
mod output;

use anyhow::Result;
use b3od_lib::{B3Client, FetchConfig};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "b3od")]
#[command(about = "Download open data tables published by B3")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a table for one or more dates
    Download(commands::download::DownloadArgs),
    /// List the tables that can be downloaded
    Tables,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("b3od=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let client = B3Client::new(FetchConfig::from_env());

    tokio::select! {
        result = run(&cli.command, &client, &format) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted by user (CTRL+C)...");
            Ok(())
        }
    }
}

async fn run(command: &Commands, client: &B3Client, format: &OutputFormat) -> Result<()> {
    match command {
        Commands::Download(args) => commands::download::run(args, client, format).await?,
        Commands::Tables => commands::tables::run(client, format)?,
    }
    Ok(())
}
