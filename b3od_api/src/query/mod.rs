mod common;
pub use self::common::{format_date, with_path, Query};
mod page;
pub use self::page::PageQuery;

mod download;
pub use self::download::{DirectoryQuery, DownloadQuery};
