// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The reconcile step for one Cakephp instance.
//!
//! Database group first, then a readiness gate, then the application group,
//! status and drift correction. Every step is safe to repeat, so an abandoned
//! or failed pass is picked up by the next one.

pub mod cascade;
pub mod drift;
pub mod ensure;
pub mod readiness;
pub mod status;

pub use drift::{Drift, DriftOutcome};
pub use ensure::{ensure, EnsureOutcome};

use crate::config::Config;
use crate::constants::requeue::PREREQUISITE_WAIT_SECS;
use crate::error::Result;
use crate::resources::{DependentGroup, PrerequisiteGroup};
use crate::types::{Cakephp, Route};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use kube::{runtime::controller::Action, Api, Client};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// What the scheduler should do after a reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing left to do until something changes
    Done,
    /// Run again right away
    RequeueNow,
    /// Run again after the delay
    RequeueAfter(Duration),
}

impl ReconcileOutcome {
    pub fn into_action(self) -> Action {
        match self {
            ReconcileOutcome::Done => Action::await_change(),
            ReconcileOutcome::RequeueNow => Action::requeue(Duration::ZERO),
            ReconcileOutcome::RequeueAfter(delay) => Action::requeue(delay),
        }
    }
}

/// Drive the managed resources of `namespace/name` one step towards the instance spec.
#[instrument(skip(client, config))]
pub async fn reconcile_instance(
    client: &Client,
    config: &Config,
    namespace: &str,
    name: &str,
) -> Result<ReconcileOutcome> {
    let instances: Api<Cakephp> = Api::namespaced(client.clone(), namespace);

    let Some(instance) = instances.get_opt(name).await? else {
        debug!("Cakephp instance no longer exists, nothing to do");
        return Ok(ReconcileOutcome::Done);
    };

    if instance.is_being_deleted() {
        if instance.has_cascade_finalizer() {
            cascade::cascade_delete(client, &instance).await?;
            cascade::remove_finalizer(&instances, &instance).await?;
        }
        return Ok(ReconcileOutcome::Done);
    }

    if config.cascade_finalizer {
        cascade::add_finalizer(&instances, &instance).await?;
    }

    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    let routes: Api<Route> = Api::namespaced(client.clone(), namespace);

    let database = PrerequisiteGroup::build(&instance);
    ensure(&secrets, &database.credential).await?;
    ensure(&deployments, &database.deployment).await?;
    ensure(&services, &database.service).await?;

    if !readiness::is_database_ready(&deployments).await {
        let delay = Duration::from_secs(PREREQUISITE_WAIT_SECS);
        info!("MySQL isn't running, waiting for {:?}", delay);
        return Ok(ReconcileOutcome::RequeueAfter(delay));
    }

    let app = DependentGroup::build(&instance);
    ensure(&deployments, &app.deployment).await?;
    ensure(&services, &app.service).await?;
    ensure(&routes, &app.route).await?;

    status::update_status(&instances, &instance).await?;

    match drift::correct_drift(&deployments, &instance).await? {
        DriftOutcome::InSync => {
            debug!("Instance is in sync");
            Ok(ReconcileOutcome::Done)
        }
        DriftOutcome::Corrected(_) => Ok(ReconcileOutcome::RequeueNow),
        DriftOutcome::Missing => {
            info!("Application deployment not found after creation, retrying later");
            Ok(ReconcileOutcome::RequeueAfter(Duration::from_secs(
                PREREQUISITE_WAIT_SECS,
            )))
        }
    }
}
