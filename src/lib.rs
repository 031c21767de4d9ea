#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod envelope;
pub mod formats;
pub mod ids;
pub mod import;
pub mod logging;
pub mod report;
pub mod sanitize;
pub mod store;
