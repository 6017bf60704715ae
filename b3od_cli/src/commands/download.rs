use anyhow::Result;
use b3od_lib::{B3Client, Backend, DateSelection};
use clap::Args;

use crate::output::{print_frame_csv, print_frame_markdown, print_frame_table, print_json, OutputFormat};

#[derive(Args)]
pub struct DownloadArgs {
    /// Table name (see `b3od tables`)
    #[arg(long, default_value = "EconomicIndicatorPrice")]
    pub table: String,

    /// Reference date, YYYY-MM-DD or YYYYMMDD. Repeat for several dates
    #[arg(long = "date", default_value = "2021-09-28")]
    pub dates: Vec<String>,

    /// Fetch protocol: auto, pages or download
    #[arg(long, default_value = "auto")]
    pub backend: String,
}

pub async fn run(args: &DownloadArgs, client: &B3Client, format: &OutputFormat) -> Result<()> {
    let backend: Backend = args.backend.parse()?;

    let dates = match args.dates.as_slice() {
        [single] => DateSelection::from(single.as_str()),
        many => DateSelection::many(many.iter().map(String::as_str)),
    };

    let frame = client.download_with(&args.table, dates, backend).await?;

    eprintln!(
        "{}: {} rows, {} columns",
        args.table,
        frame.len(),
        frame.columns().len()
    );

    match format {
        OutputFormat::Table => print_frame_table(&frame),
        OutputFormat::Json => print_json(&frame),
        OutputFormat::Csv => print_frame_csv(&frame)?,
        OutputFormat::Markdown => print_frame_markdown(&frame),
    }

    Ok(())
}
