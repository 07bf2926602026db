// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Database group: credential, single-replica MySQL deployment and its service.

use super::{credential_env, managed_metadata, plain_env, ManagedResource};
use crate::constants::mysql as db;
use crate::types::{Cakephp, Tier};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EmptyDirVolumeSource, PodSpec, PodTemplateSpec, Secret, Service,
    ServicePort, ServiceSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

/// Credential object shared by the database and the application
pub fn auth_secret(instance: &Cakephp) -> Secret {
    Secret {
        metadata: managed_metadata(instance, ManagedResource::Credential),
        type_: Some("Opaque".to_string()),
        string_data: Some(BTreeMap::from([
            (db::USERNAME_KEY.to_string(), db::USERNAME.to_string()),
            (db::PASSWORD_KEY.to_string(), db::PASSWORD.to_string()),
        ])),
        ..Default::default()
    }
}

pub fn deployment(instance: &Cakephp) -> Deployment {
    let labels = instance.labels(Tier::Prerequisite);

    Deployment {
        metadata: managed_metadata(instance, ManagedResource::DatabaseDeployment),
        spec: Some(DeploymentSpec {
            replicas: Some(1),
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
                    volumes: Some(vec![Volume {
                        name: db::VOLUME_NAME.to_string(),
                        empty_dir: Some(EmptyDirVolumeSource::default()),
                        ..Default::default()
                    }]),
                    containers: vec![Container {
                        name: db::CONTAINER_NAME.to_string(),
                        image: Some(db::IMAGE.to_string()),
                        ports: Some(vec![ContainerPort {
                            container_port: db::PORT,
                            name: Some(db::PORT_NAME.to_string()),
                            ..Default::default()
                        }]),
                        volume_mounts: Some(vec![VolumeMount {
                            name: db::VOLUME_NAME.to_string(),
                            mount_path: db::DATA_PATH.to_string(),
                            ..Default::default()
                        }]),
                        env: Some(vec![
                            plain_env("MYSQL_ROOT_PASSWORD", db::PASSWORD),
                            plain_env("MYSQL_DATABASE", db::DATABASE),
                            credential_env("MYSQL_USER", db::USERNAME_KEY),
                            credential_env("MYSQL_PASSWORD", db::PASSWORD_KEY),
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
        metadata: managed_metadata(instance, ManagedResource::DatabaseService),
        spec: Some(ServiceSpec {
            selector: Some(instance.labels(Tier::Prerequisite)),
            ports: Some(vec![ServicePort {
                port: db::PORT,
                target_port: Some(IntOrString::Int(db::PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
