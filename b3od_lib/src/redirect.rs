//! Single-file download protocol.
//!
//! A descriptor request returns a signed `redirectUrl`; following it yields
//! the whole table as one semicolon separated CSV file. The position limits
//! service hands out the same kind of file, base64 encoded.

use std::borrow::Cow;

use base64::Engine;
use chrono::NaiveDate;
use url::Url;

use b3od_api::types::DownloadDescriptor;
use b3od_api::{parse_url, with_path, DirectoryQuery, DownloadQuery, Query, Session};

use crate::catalog::{RedirectVariant, Table};
use crate::coerce::coerce_text;
use crate::error::B3Error;
use crate::frame::{Frame, Value};
use crate::schema::registry;

/// Drives the two-hop download for one table and date.
pub struct RedirectFetcher<'a> {
    session: &'a Session,
    api_base: &'a Url,
    bmf_base: &'a Url,
}

impl<'a> RedirectFetcher<'a> {
    pub fn new(session: &'a Session, api_base: &'a Url, bmf_base: &'a Url) -> Self {
        Self {
            session,
            api_base,
            bmf_base,
        }
    }

    pub async fn fetch(
        &self,
        table: Table,
        date: NaiveDate,
        variant: RedirectVariant,
    ) -> Result<Frame, B3Error> {
        let payload = match variant {
            RedirectVariant::WebConsolidated => {
                let url = DownloadQuery::new(table.name(), date)
                    .add_to_url(&with_path(self.api_base, &["download", "requestname"]));
                let descriptor: DownloadDescriptor = self.session.get_json(url).await?;
                self.follow(&descriptor).await?
            }
            RedirectVariant::PositionLimits => {
                let url = DirectoryQuery::new(date).add_to_url(&with_path(
                    self.bmf_base,
                    &["LimitesPosicoes", "Posicoes", "DownloadArquivoDiretorio"],
                ));
                let body = self.session.get_text(url).await?;
                match serde_json::from_str::<DownloadDescriptor>(body.trim()) {
                    Ok(descriptor) => self.follow(&descriptor).await?,
                    Err(_) => body,
                }
            }
        };

        let frame = decode_payload(table, variant, &payload)?;
        if frame.has_no_columns() {
            tracing::info!("No data found for {} on {}", table, date);
        } else {
            tracing::debug!("{} on {}: {} rows", table, date, frame.len());
        }
        Ok(frame)
    }

    async fn follow(&self, descriptor: &DownloadDescriptor) -> Result<String, B3Error> {
        let target = parse_url(&descriptor.resolve(self.api_base.as_str()))?;
        Ok(self.session.get_text(target).await?)
    }
}

/// Turns a downloaded payload into a typed frame.
///
/// An empty payload means the table had no data for that date and yields
/// an empty frame.
pub fn decode_payload(
    table: Table,
    variant: RedirectVariant,
    payload: &str,
) -> Result<Frame, B3Error> {
    if payload.trim().is_empty() {
        return Ok(Frame::empty());
    }

    let text: Cow<'_, str> = if variant.is_base64() {
        let cleaned: String = payload
            .trim()
            .trim_matches('"')
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
        Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Cow::Borrowed(payload)
    };

    let text: &str = &text;
    let csv_text = if variant.has_preamble() {
        skip_first_line(text)
    } else {
        text
    };

    parse_csv(table, csv_text)
}

fn skip_first_line(text: &str) -> &str {
    text.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
}

/// Parses semicolon separated, comma decimal CSV with a header row.
pub fn parse_csv(table: Table, text: &str) -> Result<Frame, B3Error> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Ok(Frame::empty());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let types = registry().schema(table).types_for(&columns);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .zip(columns.iter().zip(types.iter()))
            .map(|(cell, (column, ty))| coerce_text(column, cell, *ty))
            .collect::<Result<Vec<Value>, B3Error>>()?;
        rows.push(row);
    }

    Frame::new(columns, rows)
}
