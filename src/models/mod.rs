//! Data structures for cookie records and configuration.

pub mod config;
pub mod cookie;
