// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading workflow files and turning them into a runtime.

use std::path::PathBuf;
use thiserror::Error;

use crate::errors::GraphError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read workflow file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML workflow: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML workflow: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML.
    #[error("unsupported workflow format for '{}': expected .yaml, .yml or .toml", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// An edge in the workflow file was rejected by the graph.
    #[error("invalid workflow graph: {0}")]
    Graph(#[from] GraphError),
}
