//! CLI subcommand implementations for the nettrap binary.

pub mod capture_cmd;
pub mod download_cmd;
