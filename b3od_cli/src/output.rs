use anyhow::Result;
use b3od_lib::{Frame, Table as B3Table};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    #[serde(rename = "Table")]
    name: String,
    #[tabled(rename = "Service")]
    #[serde(rename = "Service")]
    service: String,
    #[tabled(rename = "Default")]
    #[serde(rename = "Default")]
    protocol: String,
}

// -- Row builders --

pub fn build_table_rows(tables: &[B3Table]) -> Vec<TableRow> {
    tables
        .iter()
        .map(|t| TableRow {
            name: t.name().to_string(),
            service: t.service().to_string(),
            protocol: t.default_protocol().to_string(),
        })
        .collect()
}

/// Frames have a column list only known at runtime, so they go through the
/// builder instead of a `Tabled` row type.
fn build_frame_table(frame: &Frame) -> Table {
    let mut builder = Builder::default();
    builder.push_record(frame.columns().iter().cloned());
    for row in frame.rows() {
        builder.push_record(row.iter().map(|v| v.to_string()));
    }
    builder.build()
}

// -- Table output --

pub fn print_frame_table(frame: &Frame) {
    if frame.has_no_columns() {
        eprintln!("No data");
        return;
    }
    println!("{}", build_frame_table(frame));
}

pub fn print_tables_table(tables: &[B3Table]) {
    println!("{}", Table::new(build_table_rows(tables)));
}

// -- Markdown output --

pub fn print_frame_markdown(frame: &Frame) {
    if frame.has_no_columns() {
        eprintln!("No data");
        return;
    }
    let mut table = build_frame_table(frame);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_tables_markdown(tables: &[B3Table]) {
    let mut table = Table::new(build_table_rows(tables));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_frame_csv<W: std::io::Write>(frame: &Frame, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if !frame.has_no_columns() {
        wtr.write_record(frame.columns())?;
    }
    for row in frame.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_frame_csv(frame: &Frame) -> Result<()> {
    write_frame_csv(frame, std::io::stdout())
}

pub fn print_tables_csv(tables: &[B3Table]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_table_rows(tables) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b3od_lib::Value;
    use chrono::NaiveDate;

    fn sample_frame() -> Frame {
        Frame::new(
            vec!["RptDt".into(), "TckrSymb".into(), "PricVal".into()],
            vec![
                vec![
                    Value::Date(NaiveDate::from_ymd_opt(2021, 9, 28).unwrap()),
                    Value::Text("DI1F22".into()),
                    Value::Float(6.15),
                ],
                vec![
                    Value::Date(NaiveDate::from_ymd_opt(2021, 9, 28).unwrap()),
                    Value::Text("DOLV21".into()),
                    Value::Null,
                ],
            ],
        )
        .unwrap()
    }

    fn csv_string(frame: &Frame) -> String {
        let mut buf = Vec::new();
        write_frame_csv(frame, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_build_table_rows_covers_catalog() {
        let rows = build_table_rows(&B3Table::ALL);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[4].name, "EconomicIndicatorPrice");
        assert_eq!(rows[4].service, "WebConsolidated");
        assert_eq!(rows[4].protocol, "pages");
        assert_eq!(rows[10].name, "PositionLimits");
        assert_eq!(rows[10].protocol, "download");
    }

    #[test]
    fn test_csv_frame_headers_and_nulls() {
        let csv = csv_string(&sample_frame());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "RptDt,TckrSymb,PricVal");
        assert_eq!(lines[1], "2021-09-28,DI1F22,6.15");
        assert_eq!(lines[2], "2021-09-28,DOLV21,");
    }

    #[test]
    fn test_csv_empty_frame_is_empty() {
        assert_eq!(csv_string(&Frame::empty()), "");
    }

    #[test]
    fn test_markdown_frame_structure() {
        let mut table = build_frame_table(&sample_frame());
        table.with(Style::markdown());
        let md = table.to_string();

        assert!(md.contains('|'));
        assert!(md.contains("---"));
        let header_line = md.lines().next().unwrap();
        assert!(header_line.contains("RptDt"));
        assert!(header_line.contains("PricVal"));
        assert_eq!(md.lines().count(), 4);
    }

    #[test]
    fn test_json_frame_shape() {
        let val = serde_json::to_value(sample_frame()).unwrap();
        assert_eq!(val["columns"][1], "TckrSymb");
        assert_eq!(val["data"].as_array().unwrap().len(), 2);
        assert_eq!(val["data"][0][0], "2021-09-28");
        assert!(val["data"][1][2].is_null());
    }
}
