// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application group: the CakePHP deployment, its service and the public route.

use super::{credential_env, managed_metadata, plain_env, ManagedResource};
use crate::constants::{demo as app, mysql as db};
use crate::types::{Cakephp, Route, RouteSpec, RouteTargetReference, Tier};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;

pub fn deployment(instance: &Cakephp) -> Deployment {
    let labels = instance.labels(Tier::Dependent);

    Deployment {
        metadata: managed_metadata(instance, ManagedResource::DemoDeployment),
        spec: Some(DeploymentSpec {
            replicas: Some(instance.spec.size),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: app::CONTAINER_NAME.to_string(),
                        image: Some(app::IMAGE.to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: app::PORT,
                            name: Some(app::PORT_NAME.to_string()),
                            ..Default::default()
                        }]),
                        env: Some(vec![
                            plain_env("DATABASE_SERVICE_NAME", db::SERVICE_NAME),
                            plain_env("DATABASE_NAME", db::DATABASE),
                            plain_env(app::TITLE_ENV, &instance.spec.title),
                            plain_env("MYSQL_SERVICE_HOST", db::SERVICE_NAME),
                            plain_env("SESSION_DEFAULTS", "database"),
                            credential_env("DATABASE_USER", db::USERNAME_KEY),
                            credential_env("DATABASE_PASSWORD", db::PASSWORD_KEY),
                        ]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn service(instance: &Cakephp) -> Service {
    Service {
        metadata: managed_metadata(instance, ManagedResource::DemoService),
        spec: Some(ServiceSpec {
            selector: Some(instance.labels(Tier::Dependent)),
            ports: Some(vec![ServicePort {
                protocol: Some("TCP".to_string()),
                port: app::SERVICE_PORT,
                target_port: Some(IntOrString::Int(app::PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Route exposing the application service, addressed by the service name
pub fn route(instance: &Cakephp) -> Route {
    Route {
        metadata: managed_metadata(instance, ManagedResource::DemoRoute),
        spec: RouteSpec {
            host: None,
            to: RouteTargetReference {
                kind: "Service".to_string(),
                name: instance.demo_service_name(),
                weight: None,
            },
        },
    }
}
