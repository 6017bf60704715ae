pub mod download;
pub mod tables;
