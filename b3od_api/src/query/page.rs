use chrono::NaiveDate;
use url::Url;

use super::common::{format_date, with_path, Query};

/// Addresses one page of a table: `{base}/{table}/{date}/{page}`.
#[derive(Clone, Debug)]
pub struct PageQuery {
    pub table: String,
    pub date: NaiveDate,
    /// Page number (1-indexed). Defaults to 1.
    pub page: i64,
}

impl PageQuery {
    pub fn new(table: &str, date: NaiveDate) -> Self {
        Self {
            table: table.to_string(),
            date,
            page: 1,
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }
}

impl Query for PageQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        with_path(
            url,
            &[
                self.table.as_str(),
                format_date(self.date).as_str(),
                self.page.to_string().as_str(),
            ],
        )
    }
}
