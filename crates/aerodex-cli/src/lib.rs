//! Aerodex CLI - command-line interface tying the Aerodex crates together.
//!
//! - [`config`] - clap definitions and settings resolution
//! - [`seed`] - seed file parsing for `aerodex sync --file`
//! - [`export`] - JSONL, JSON and CSV writers for `aerodex export`

pub mod config;
pub mod export;
pub mod seed;

pub use config::{Command, Config, ExportFormat, Settings};
