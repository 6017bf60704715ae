//! Shared query infrastructure: the [`Query`] trait and URL helpers.

use chrono::NaiveDate;
use url::Url;

/// Trait implemented by all request builders.
pub trait Query {
    /// Appends this query's path segments or parameters to the given URL,
    /// returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Formats a query date the way every B3 endpoint expects it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Appends path segments to `base`, keeping whatever path it already has.
pub fn with_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
