//! # ngp - Interactive, Concurrent Recursive Source-Code Grep
//!
//! A terminal tool that recursively scans a directory tree for a pattern, using a small
//! producer/consumer pipeline (directory walker, two scanning workers, one collator) to keep
//! the UI responsive while the scan runs in the background, and lets the user narrow results
//! interactively through a stack of subsearches.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types
//! - [`matcher`] - Pattern matching engines (regex, substring, Boyer-Moore-Horspool, Rabin-Karp)
//! - [`model`] - The result store: entries, searches, attributes
//! - [`sync`] - The counting semaphore the scan pipeline is built on
//! - [`scan`] - The concurrent scan pipeline: splitter, workers, collator, walker
//! - [`subsearch`] - The narrow-search stack
//! - [`config`] - CLI parsing and `ngprc` loading
//! - [`editor`] - Shelling out to the configured editor
//! - [`ui`] - The terminal interface
//! - [`app`] - Application core and component coordination

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod matcher;
pub mod model;
pub mod scan;
pub mod subsearch;
pub mod sync;
pub mod ui;

pub use app::Application;
pub use error::{NgpError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
