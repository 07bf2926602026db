// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cakephp reconciler - watches Cakephp instances and the resources they own.

use crate::config::Config;
use crate::error::{OperatorError, Result};
use crate::reconcile::reconcile_instance;
use crate::types::{Cakephp, Route};
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct CakephpReconciler {
    client: Client,
    config: Config,
}

impl CakephpReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    /// Api handle scoped to the watched namespace, or cluster wide
    fn scoped_api<K>(&self) -> Api<K>
    where
        K: Resource<DynamicType = (), Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        match &self.config.watch_namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let instances: Api<Cakephp> = self.scoped_api();
        let deployments: Api<Deployment> = self.scoped_api();
        let services: Api<Service> = self.scoped_api();
        let secrets: Api<Secret> = self.scoped_api();
        let routes: Api<Route> = self.scoped_api();

        info!(
            "Watching Cakephp instances in {}",
            self.config.watch_namespace.as_deref().unwrap_or("all namespaces")
        );
        let context = Arc::new(self);

        Controller::new(instances, WatcherConfig::default())
            .owns(deployments, WatcherConfig::default())
            .owns(services, WatcherConfig::default())
            .owns(secrets, WatcherConfig::default())
            .owns(routes, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled cakephp: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(instance: Arc<Cakephp>, ctx: Arc<CakephpReconciler>) -> Result<Action> {
    let name = instance.name_any();
    let namespace = instance
        .namespace()
        .ok_or(OperatorError::MissingObjectKey(".metadata.namespace"))?;

    reconcile_instance(&ctx.client, &ctx.config, &namespace, &name)
        .await
        .map(|outcome| outcome.into_action())
}

fn error_policy(
    _instance: Arc<Cakephp>,
    error: &OperatorError,
    _ctx: Arc<CakephpReconciler>,
) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(error.requeue_delay())
}
