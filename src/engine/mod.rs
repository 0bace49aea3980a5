// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod admission;
pub mod context;
pub mod executor;
pub mod factory;
pub mod report;
pub mod run_state;

pub use context::{NodeContext, RunContext};
pub use executor::Executor;
pub use factory::ExecutorFactory;
pub use report::ExecutionReport;
pub use run_state::NodeStatus;
