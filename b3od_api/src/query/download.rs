use chrono::NaiveDate;
use url::Url;

use super::common::{format_date, Query};

/// Parameters for `download/requestname`.
///
/// The endpoint wants an (empty) `recaptchaToken` parameter on every call.
#[derive(Clone, Debug)]
pub struct DownloadQuery {
    pub file_name: String,
    pub date: NaiveDate,
}

impl DownloadQuery {
    pub fn new(file_name: &str, date: NaiveDate) -> Self {
        Self {
            file_name: file_name.to_string(),
            date,
        }
    }
}

impl Query for DownloadQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("fileName", &self.file_name)
            .append_pair("date", &format_date(self.date))
            .append_pair("recaptchaToken", "");
        url
    }
}

/// Parameters for the position limits directory download.
#[derive(Clone, Debug)]
pub struct DirectoryQuery {
    pub date: NaiveDate,
}

impl DirectoryQuery {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Query for DirectoryQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("data", &format_date(self.date));
        url
    }
}
