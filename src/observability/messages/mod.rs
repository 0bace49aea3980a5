// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit the event with typed fields at its documented level.
//!
//! # Organization
//!
//! * `engine` - Run lifecycle events
//! * `node` - Per-node scheduling events
//! * `graph` - Graph construction events
//!
//! # Usage Pattern
//!
//! ```rust
//! use dagflow::observability::messages::engine::ExecutionStarted;
//!
//! let msg = ExecutionStarted {
//!     node_count: 11,
//!     edge_count: 9,
//!     max_concurrency: 4,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod engine;
pub mod graph;
pub mod node;

/// A message that knows how to log itself with structured fields.
pub trait StructuredLog {
    /// Emit the event at the message's level.
    fn log(&self);

    /// A span carrying the message's fields, for scoping follow-up events.
    fn span(&self, name: &str) -> Span;
}
