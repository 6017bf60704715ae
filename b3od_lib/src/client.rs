//! Table router: picks the protocol for a table and fans out over dates.

use std::sync::Arc;

use chrono::NaiveDate;

use b3od_api::{parse_url, Session};

use crate::aggregate;
use crate::catalog::{Backend, Protocol, Table};
use crate::config::FetchConfig;
use crate::date::{normalize_date, DateInput};
use crate::error::B3Error;
use crate::frame::Frame;
use crate::paginated::PaginatedFetcher;
use crate::redirect::RedirectFetcher;

/// One date or several.
#[derive(Clone, Debug)]
pub enum DateSelection {
    One(DateInput),
    Many(Vec<DateInput>),
}

impl DateSelection {
    pub fn many<I, D>(dates: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DateInput>,
    {
        Self::Many(dates.into_iter().map(Into::into).collect())
    }
}

impl From<DateInput> for DateSelection {
    fn from(value: DateInput) -> Self {
        Self::One(value)
    }
}

impl From<NaiveDate> for DateSelection {
    fn from(value: NaiveDate) -> Self {
        Self::One(value.into())
    }
}

impl From<&str> for DateSelection {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for DateSelection {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl From<Vec<NaiveDate>> for DateSelection {
    fn from(value: Vec<NaiveDate>) -> Self {
        Self::many(value)
    }
}

impl From<&[NaiveDate]> for DateSelection {
    fn from(value: &[NaiveDate]) -> Self {
        Self::many(value.iter().copied())
    }
}

impl From<Vec<&str>> for DateSelection {
    fn from(value: Vec<&str>) -> Self {
        Self::many(value)
    }
}

impl From<Vec<String>> for DateSelection {
    fn from(value: Vec<String>) -> Self {
        Self::many(value)
    }
}

/// Entry point for downloading B3 tables.
///
/// Cheap to clone. Every fetch opens its own [`Session`], which is closed
/// when that fetch returns, so concurrent fetches share nothing but the
/// configuration.
#[derive(Clone)]
pub struct B3Client {
    config: Arc<FetchConfig>,
}

impl Default for B3Client {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl B3Client {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a client with every endpoint on a custom base URL. Used for
    /// testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(FetchConfig::with_base_url(base_url))
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Every table that can be downloaded.
    pub fn list_tables(&self) -> &'static [Table] {
        &Table::ALL
    }

    /// Downloads `table` for one date or many, using the table's default
    /// protocol.
    pub async fn download(
        &self,
        table: &str,
        dates: impl Into<DateSelection>,
    ) -> Result<Frame, B3Error> {
        self.download_with(table, dates, Backend::Auto).await
    }

    /// Like [`B3Client::download`] with an explicit backend choice.
    ///
    /// The table name and every date are validated before any request is
    /// sent.
    pub async fn download_with(
        &self,
        table: &str,
        dates: impl Into<DateSelection>,
        backend: Backend,
    ) -> Result<Frame, B3Error> {
        let table: Table = table.parse()?;
        let protocol = table.protocol(backend)?;

        match dates.into() {
            DateSelection::One(input) => {
                let date = normalize_date(input)?;
                tracing::info!("Downloading {} for {}", table, date);
                self.fetch_one(table, protocol, date).await
            }
            DateSelection::Many(inputs) => {
                let dates = inputs
                    .into_iter()
                    .map(normalize_date)
                    .collect::<Result<Vec<_>, B3Error>>()?;
                tracing::info!("Downloading {} for {} dates", table, dates.len());
                let client = self.clone();
                aggregate::fetch_many(dates, self.config.concurrency, move |date| {
                    let client = client.clone();
                    async move { client.fetch_one(table, protocol, date).await }
                })
                .await
            }
        }
    }

    /// Fetches one table for one already normalized date.
    pub async fn fetch_one(
        &self,
        table: Table,
        protocol: Protocol,
        date: NaiveDate,
    ) -> Result<Frame, B3Error> {
        let session = Session::open(self.config.session_config())?;
        match protocol {
            Protocol::Paginated => {
                let base = parse_url(&self.config.tables_base_url)?;
                PaginatedFetcher::new(&session, &base, self.config.max_page_errors)
                    .fetch(table, date)
                    .await
            }
            Protocol::Redirect(variant) => {
                let api_base = parse_url(&self.config.api_base_url)?;
                let bmf_base = parse_url(&self.config.bmf_base_url)?;
                RedirectFetcher::new(&session, &api_base, &bmf_base)
                    .fetch(table, date, variant)
                    .await
            }
        }
    }

    /// Economic indicator prices for one date.
    pub async fn economic_indicators(
        &self,
        date: impl Into<DateInput>,
    ) -> Result<Frame, B3Error> {
        self.download(Table::EconomicIndicatorPrice.name(), DateSelection::One(date.into()))
            .await
    }

    /// Consolidated trade information for one date.
    pub async fn trade_information(&self, date: impl Into<DateInput>) -> Result<Frame, B3Error> {
        self.download(
            Table::TradeInformationConsolidated.name(),
            DateSelection::One(date.into()),
        )
        .await
    }

    /// Consolidated instrument registry for one date.
    pub async fn instruments(&self, date: impl Into<DateInput>) -> Result<Frame, B3Error> {
        self.download(
            Table::InstrumentsConsolidated.name(),
            DateSelection::One(date.into()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_from_common_types() {
        assert!(matches!(DateSelection::from("2021-09-28"), DateSelection::One(_)));
        let many = DateSelection::from(vec!["2021-09-27", "2021-09-28"]);
        match many {
            DateSelection::Many(v) => assert_eq!(v.len(), 2),
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[test]
    fn list_tables_is_full_catalog() {
        let client = B3Client::default();
        assert_eq!(client.list_tables().len(), 11);
        assert_eq!(client.list_tables()[4], Table::EconomicIndicatorPrice);
    }
}
