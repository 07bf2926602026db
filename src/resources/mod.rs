// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Desired state of the resources managed on behalf of a Cakephp instance.
//!
//! Everything here is pure: the same instance always yields the same objects,
//! which is what makes create-if-missing and drift comparison safe to repeat.

pub mod demo;
pub mod mysql;

use crate::constants::mysql as db;
use crate::types::{Cakephp, Route, Tier};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, Secret, SecretKeySelector, Service};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use std::fmt;

/// Every resource kind an instance owns, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManagedResource {
    Credential,
    DatabaseDeployment,
    DatabaseService,
    DemoDeployment,
    DemoService,
    DemoRoute,
}

impl ManagedResource {
    pub const ALL: [ManagedResource; 6] = [
        ManagedResource::Credential,
        ManagedResource::DatabaseDeployment,
        ManagedResource::DatabaseService,
        ManagedResource::DemoDeployment,
        ManagedResource::DemoService,
        ManagedResource::DemoRoute,
    ];

    pub fn name(&self, instance: &Cakephp) -> String {
        match self {
            ManagedResource::Credential => db::AUTH_SECRET_NAME.to_string(),
            ManagedResource::DatabaseDeployment => db::DEPLOYMENT_NAME.to_string(),
            ManagedResource::DatabaseService => db::SERVICE_NAME.to_string(),
            ManagedResource::DemoDeployment => instance.demo_deployment_name(),
            ManagedResource::DemoService | ManagedResource::DemoRoute => instance.demo_service_name(),
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            ManagedResource::Credential
            | ManagedResource::DatabaseDeployment
            | ManagedResource::DatabaseService => Tier::Prerequisite,
            _ => Tier::Dependent,
        }
    }
}

impl fmt::Display for ManagedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ManagedResource::Credential => "Secret",
            ManagedResource::DatabaseDeployment | ManagedResource::DemoDeployment => "Deployment",
            ManagedResource::DatabaseService | ManagedResource::DemoService => "Service",
            ManagedResource::DemoRoute => "Route",
        };
        f.write_str(kind)
    }
}

/// The database group: must exist and be ready before the application is created
#[derive(Clone, Debug)]
pub struct PrerequisiteGroup {
    pub credential: Secret,
    pub deployment: Deployment,
    pub service: Service,
}

/// The user-facing application group
#[derive(Clone, Debug)]
pub struct DependentGroup {
    pub deployment: Deployment,
    pub service: Service,
    pub route: Route,
}

impl PrerequisiteGroup {
    pub fn build(instance: &Cakephp) -> Self {
        Self {
            credential: mysql::auth_secret(instance),
            deployment: mysql::deployment(instance),
            service: mysql::service(instance),
        }
    }
}

impl DependentGroup {
    pub fn build(instance: &Cakephp) -> Self {
        Self {
            deployment: demo::deployment(instance),
            service: demo::service(instance),
            route: demo::route(instance),
        }
    }
}

/// Metadata for a managed resource: namespace and owner taken from the instance
fn managed_metadata(instance: &Cakephp, resource: ManagedResource) -> ObjectMeta {
    ObjectMeta {
        name: Some(resource.name(instance)),
        namespace: instance.namespace(),
        labels: Some(instance.labels(resource.tier())),
        owner_references: instance.owner_reference().map(|owner| vec![owner]),
        ..Default::default()
    }
}

fn plain_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

/// Environment entry read from a key of the database credential object
fn credential_env(name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: db::AUTH_SECRET_NAME.to_string(),
                key: key.to_string(),
                optional: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
