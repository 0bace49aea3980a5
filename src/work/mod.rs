// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made [`Work`](crate::traits::Work) implementations.
//!
//! ## Sleeping Work
//! A placeholder workload that sleeps per node and can be told to fail on
//! chosen nodes. The demo binary uses it to show scheduling, admission and
//! failure cascades without any real work attached.
//!
//! ## Stub Work (Test-Only)
//! Instrumented work for executor tests:
//! - **RecordingWork**: records start/finish order, invocation counts and peak
//!   concurrency, with optional per-node failures
//! - **Note**: NOT available in production builds

mod sleeping;
#[cfg(test)]
pub mod stub;

pub use sleeping::SleepingWork;
