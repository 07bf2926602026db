// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::requeue::ERROR_BACKOFF_SECS;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to update status of {0}: {1}")]
    StatusWriteError(String, #[source] kube::Error),

    #[error("Invalid patch: {0}")]
    PatchError(#[from] serde_json::Error),

    #[error("Object is missing {0}")]
    MissingObjectKey(&'static str),
}

impl OperatorError {
    /// How long the controller waits before retrying after this error
    pub fn requeue_delay(&self) -> Duration {
        match self {
            OperatorError::StatusWriteError(..) => Duration::ZERO,
            _ => Duration::from_secs(ERROR_BACKOFF_SECS),
        }
    }
}

pub type Result<T> = std::result::Result<T, OperatorError>;
