use anyhow::Result;
use b3od_lib::B3Client;

use crate::output::{
    build_table_rows, print_json, print_tables_csv, print_tables_markdown, print_tables_table,
    OutputFormat,
};

pub fn run(client: &B3Client, format: &OutputFormat) -> Result<()> {
    let tables = client.list_tables();

    match format {
        OutputFormat::Table => print_tables_table(tables),
        OutputFormat::Json => print_json(&build_table_rows(tables)),
        OutputFormat::Csv => print_tables_csv(tables)?,
        OutputFormat::Markdown => print_tables_markdown(tables),
    }

    Ok(())
}
