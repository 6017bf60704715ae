//! Paginated JSON table protocol.
//!
//! Page 1 reports how many pages exist; every page is then requested in
//! order. Pages that come back with a non-JSON content type are skipped, and
//! too many of them in a row stop the download early with whatever was
//! collected so far.

use chrono::NaiveDate;
use url::Url;

use b3od_api::types::{RawPage, Row};
use b3od_api::{is_json, read_json, Error, PageQuery, Query, Session};

use crate::catalog::Table;
use crate::coerce::coerce_json;
use crate::error::B3Error;
use crate::frame::{Frame, Value};
use crate::schema::registry;

/// Where a [`PageStream`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    Iterating,
    /// Every page was read, or the server reported no more pages.
    Done,
    /// Stopped after too many consecutive non-JSON pages.
    AbortedEarly,
}

/// Lazy, finite sequence of row batches, one per page.
///
/// Not restartable: once it has finished a new stream must be opened.
pub struct PageStream<'s> {
    session: &'s Session,
    base: Url,
    query: PageQuery,
    page_count: i64,
    next_page: i64,
    error_count: u32,
    max_errors: u32,
    state: StreamState,
}

impl<'s> PageStream<'s> {
    /// Requests page 1 to learn the page count.
    pub async fn open(
        session: &'s Session,
        base: &Url,
        query: PageQuery,
        max_errors: u32,
    ) -> Result<PageStream<'s>, Error> {
        let first_url = query.clone().with_page(1).add_to_url(base);
        let first: RawPage = session.get_json(first_url).await?;
        tracing::debug!("{} reports {} pages", query.table, first.page_count);
        Ok(Self {
            session,
            base: base.clone(),
            query,
            page_count: first.page_count,
            next_page: 1,
            error_count: 0,
            max_errors,
            state: StreamState::Iterating,
        })
    }

    /// Page count reported by page 1.
    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Rows of the next usable page, or `None` once the stream has finished.
    ///
    /// A non-success status on any page is fatal.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Row>>, Error> {
        while self.state == StreamState::Iterating {
            if self.next_page > self.page_count {
                self.state = StreamState::Done;
                break;
            }
            let page = self.next_page;
            self.next_page += 1;

            let url = self.query.clone().with_page(page).add_to_url(&self.base);
            let resp = match self.session.get(url).await {
                Ok(resp) => resp,
                Err(e) => {
                    self.state = StreamState::Done;
                    return Err(e);
                }
            };

            if !is_json(&resp) {
                self.error_count += 1;
                tracing::warn!(
                    "page {}/{} of {} is not JSON ({} in a row)",
                    page,
                    self.page_count,
                    self.query.table,
                    self.error_count
                );
                if self.error_count >= self.max_errors {
                    tracing::warn!("Too many errors while importing, request finished early");
                    self.state = StreamState::AbortedEarly;
                }
                continue;
            }

            let body: RawPage = match read_json(resp).await {
                Ok(body) => body,
                Err(e) => {
                    self.state = StreamState::Done;
                    return Err(e);
                }
            };
            self.error_count = 0;

            if body.page_count <= 0 {
                tracing::debug!("page {} of {} reports no pages left", page, self.query.table);
                self.state = StreamState::Done;
                break;
            }
            return Ok(Some(body.values));
        }
        Ok(None)
    }
}

/// Downloads a whole table through the paginated API.
pub struct PaginatedFetcher<'a> {
    session: &'a Session,
    base: &'a Url,
    max_errors: u32,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(session: &'a Session, base: &'a Url, max_errors: u32) -> Self {
        Self {
            session,
            base,
            max_errors,
        }
    }

    pub async fn fetch(&self, table: Table, date: NaiveDate) -> Result<Frame, B3Error> {
        let query = PageQuery::new(table.name(), date);
        let mut stream =
            PageStream::open(self.session, self.base, query.clone(), self.max_errors).await?;

        let mut raw_rows: Vec<Row> = Vec::new();
        while let Some(batch) = stream.next_batch().await? {
            raw_rows.extend(batch);
        }
        tracing::debug!(
            "{} on {}: {} rows ({:?})",
            table,
            date,
            raw_rows.len(),
            stream.state()
        );

        let columns = self.fetch_columns(query).await?;
        let types = registry().schema(table).types_for(&columns);

        let rows = raw_rows
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                if raw.len() != columns.len() {
                    return Err(B3Error::ArityMismatch {
                        row: idx,
                        expected: columns.len(),
                        found: raw.len(),
                    });
                }
                raw.iter()
                    .zip(columns.iter().zip(types.iter()))
                    .map(|(cell, (column, ty))| coerce_json(column, cell, *ty))
                    .collect::<Result<Vec<Value>, B3Error>>()
            })
            .collect::<Result<Vec<_>, B3Error>>()?;

        Frame::new(columns, rows)
    }

    async fn fetch_columns(&self, query: PageQuery) -> Result<Vec<String>, B3Error> {
        let url = query.with_page(1).add_to_url(self.base);
        let first: RawPage = self.session.get_json(url).await?;
        Ok(first.column_names())
    }
}
