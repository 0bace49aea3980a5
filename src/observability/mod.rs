// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in dagflow. Message types follow a struct-based pattern with a `Display`
//! implementation so that:
//!
//! * Log text lives in one place instead of being scattered through the engine
//! * Every event carries the same structured fields wherever it is emitted
//! * Human-readable output and machine-readable fields stay in sync
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - Run lifecycle events (start, completion, failure)
//! * `messages::node` - Per-node protocol events (waiting, admitted, skipped, finished)
//! * `messages::graph` - Graph construction events (rejected edges, repeated nodes)
//!
//! # Usage
//!
//! ```rust
//! use dagflow::observability::messages::node::NodeSkipped;
//! use dagflow::observability::messages::StructuredLog;
//!
//! let failed = vec!["3"];
//! let msg = NodeSkipped {
//!     node: "8",
//!     failed_dependencies: &failed,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to `default_directive` when it is unset or
/// invalid. Calling this more than once is harmless: later calls are ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
