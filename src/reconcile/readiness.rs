// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Readiness gate for the database workload.

use crate::constants::mysql::DEPLOYMENT_NAME;
use k8s_openapi::api::apps::v1::Deployment;
use kube::Api;
use tracing::{debug, warn};

/// The database runs a single replica, so it is ready when exactly one replica is.
pub fn has_single_ready_replica(deployment: &Deployment) -> bool {
    deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        == Some(1)
}

/// Check whether the database deployment is up. Read failures, including a
/// missing deployment, count as not ready.
pub async fn is_database_ready(deployments: &Api<Deployment>) -> bool {
    match deployments.get_opt(DEPLOYMENT_NAME).await {
        Ok(Some(deployment)) => has_single_ready_replica(&deployment),
        Ok(None) => {
            debug!("Deployment {} not found", DEPLOYMENT_NAME);
            false
        }
        Err(e) => {
            warn!("Failed to read deployment {}: {}", DEPLOYMENT_NAME, e);
            false
        }
    }
}
