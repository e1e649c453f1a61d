//! Common utilities for the Tarsier crates.
//!
//! This crate provides shared infrastructure used by the query and event
//! components:
//! - **Warning System** - colored terminal output for recoverable misuse

pub mod warning;
