//! Library layer for b3od: table catalog, typed frames, and the fetchers for
//! the two B3 download protocols.
//!
//! Wraps the `b3od_api` HTTP crate with date normalization, per-table
//! schemas, and concurrent fan-out over dates.

pub mod aggregate;
pub mod catalog;
pub mod client;
pub mod coerce;
pub mod config;
pub mod date;
pub mod error;
pub mod frame;
pub mod paginated;
pub mod redirect;
pub mod schema;

pub use b3od_api;

pub use catalog::{Backend, Protocol, RedirectVariant, Service, Table};
pub use client::{B3Client, DateSelection};
pub use config::FetchConfig;
pub use date::{normalize_date, DateInput};
pub use error::B3Error;
pub use frame::{Frame, Value};
pub use paginated::{PageStream, PaginatedFetcher, StreamState};
pub use redirect::RedirectFetcher;
pub use schema::{registry, ColumnType, Schema, SchemaRegistry};
