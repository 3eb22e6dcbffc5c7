//! Aerodex Client - HTTP client for the upstream aviation registry
//!
//! - [`aviation`] - batched airport lookups and the raw → normalized mapping
//!
//! # Overview
//!
//! The client handles request building, timeout and status classification,
//! response parsing, and the conversion of the registry's string-typed
//! records into [`aerodex_core::NewAirport`].

pub mod aviation;

pub use aviation::{AviationAirport, AviationClient};
