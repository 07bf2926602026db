// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drift correction for the application deployment.
//!
//! Only the replica count and the title environment entry are compared. At
//! most one correction is applied per pass: replicas are checked first.

use crate::constants::{demo::TITLE_ENV, OPERATOR_NAME};
use crate::error::Result;
use crate::types::Cakephp;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::EnvVar;
use kube::{api::PostParams, Api, ResourceExt};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    Replicas { desired: i32, observed: Option<i32> },
    Title { desired: String, observed: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftOutcome {
    InSync,
    Corrected(Drift),
    /// The deployment disappeared between creation and the drift check
    Missing,
}

fn title_env(deployment: &Deployment) -> Option<&EnvVar> {
    deployment
        .spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .first()?
        .env
        .as_ref()?
        .iter()
        .find(|e| e.name == TITLE_ENV)
}

fn title_env_mut(deployment: &mut Deployment) -> Option<&mut EnvVar> {
    deployment
        .spec
        .as_mut()?
        .template
        .spec
        .as_mut()?
        .containers
        .first_mut()?
        .env
        .as_mut()?
        .iter_mut()
        .find(|e| e.name == TITLE_ENV)
}

/// First mismatch between the instance spec and the live deployment
pub fn detect_drift(instance: &Cakephp, live: &Deployment) -> Option<Drift> {
    let observed = live.spec.as_ref().and_then(|s| s.replicas);
    if observed != Some(instance.spec.size) {
        return Some(Drift::Replicas {
            desired: instance.spec.size,
            observed,
        });
    }

    // Without a title entry there is nothing to compare
    let observed = title_env(live)?
        .value
        .clone()
        .unwrap_or_default();
    (observed != instance.spec.title).then(|| Drift::Title {
        desired: instance.spec.title.clone(),
        observed,
    })
}

/// Write the desired value of `drift` into the deployment.
/// Returns false when the deployment has nowhere to hold it.
pub fn apply_drift(live: &mut Deployment, drift: &Drift) -> bool {
    match drift {
        Drift::Replicas { desired, .. } => match live.spec.as_mut() {
            Some(spec) => {
                spec.replicas = Some(*desired);
                true
            }
            None => false,
        },
        Drift::Title { desired, .. } => match title_env_mut(live) {
            Some(env) => {
                env.value = Some(desired.clone());
                env.value_from = None;
                true
            }
            None => false,
        },
    }
}

/// Compare the live application deployment with the instance and fix the first mismatch.
#[instrument(skip(deployments, instance), fields(deployment = %instance.demo_deployment_name()))]
pub async fn correct_drift(deployments: &Api<Deployment>, instance: &Cakephp) -> Result<DriftOutcome> {
    let name = instance.demo_deployment_name();
    let Some(mut live) = deployments.get_opt(&name).await? else {
        return Ok(DriftOutcome::Missing);
    };

    let Some(drift) = detect_drift(instance, &live) else {
        return Ok(DriftOutcome::InSync);
    };

    if !apply_drift(&mut live, &drift) {
        warn!("Deployment {} has no spec to correct, skipping", name);
        return Ok(DriftOutcome::InSync);
    }

    info!("Correcting drift on deployment {}: {:?}", live.name_any(), drift);
    deployments
        .replace(
            &name,
            &PostParams {
                field_manager: Some(OPERATOR_NAME.to_string()),
                ..Default::default()
            },
            &live,
        )
        .await
        .inspect_err(|e| error!("Failed to update deployment {}: {}", name, e))?;

    Ok(DriftOutcome::Corrected(drift))
}
