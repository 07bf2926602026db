// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Only watch Cakephp instances in this namespace; all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Add a finalizer to every instance and delete its managed resources explicitly
    pub cascade_finalizer: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let cascade_finalizer = match lookup("CASCADE_FINALIZER") {
            Some(value) if !value.trim().is_empty() => value
                .trim()
                .parse::<bool>()
                .with_context(|| format!("CASCADE_FINALIZER must be true or false, got '{}'", value))?,
            _ => false,
        };

        Ok(Config {
            watch_namespace,
            cascade_finalizer,
        })
    }
}
