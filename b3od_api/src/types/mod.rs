mod page;
pub use self::page::{ColumnInfo, RawPage, Row};

mod download;
pub use self::download::DownloadDescriptor;
