mod client;
mod errors;
mod query;
pub mod types;
pub mod user_agent;
pub use self::client::{is_json, parse_url, read_json, read_text, Session, SessionConfig};
pub use self::errors::Error;
pub use self::query::{format_date, with_path, DirectoryQuery, DownloadQuery, PageQuery, Query};
