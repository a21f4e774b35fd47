//! Parsing and validation helpers shared by ingestion and the CLI.

pub mod numbers;
pub mod time;
