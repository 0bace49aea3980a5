// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // workflow files + runtime assembly
pub mod engine;     // DAG executor
pub mod errors;     // error handling
pub mod graph;      // nodes, edges, cycle checks
pub mod observability;
pub mod traits;     // unified abstractions
pub mod work;       // ready-made workloads
