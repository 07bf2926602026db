// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{demo, labels, FINALIZER};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{CustomResource, Resource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(group = "cakephp.example.com", version = "v1alpha1", kind = "Cakephp")]
#[kube(namespaced)]
#[kube(status = "CakephpStatus")]
#[kube(printcolumn = r#"{"name":"Size","type":"integer","jsonPath":".spec.size"}"#)]
#[serde(rename_all = "camelCase")]
pub struct CakephpSpec {
    /// Desired replica count of the application workload
    #[serde(default)]
    pub size: i32,
    /// Display value injected into the application environment
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CakephpStatus {
    #[serde(default)]
    pub pod_status: String,
}

/// Which group a managed resource belongs to. Workload pod labels and
/// service selectors must be built from the same tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// The database group that has to be ready first
    Prerequisite,
    /// The application group created once the database is up
    Dependent,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Prerequisite => "mysql",
            Tier::Dependent => "demo",
        }
    }
}

impl Cakephp {
    /// Label set shared by all resources of the given tier
    pub fn labels(&self, tier: Tier) -> BTreeMap<String, String> {
        BTreeMap::from([
            (labels::APP.to_string(), labels::APP_VALUE.to_string()),
            (labels::INSTANCE.to_string(), self.name_any()),
            (labels::TIER.to_string(), tier.as_str().to_string()),
        ])
    }

    /// Controller owner reference pointing at this instance, if it has been persisted
    pub fn owner_reference(&self) -> Option<OwnerReference> {
        self.controller_owner_ref(&())
    }

    pub fn demo_deployment_name(&self) -> String {
        format!("{}{}", self.name_any(), demo::DEPLOYMENT_SUFFIX)
    }

    pub fn demo_service_name(&self) -> String {
        format!("{}{}", self.name_any(), demo::SERVICE_SUFFIX)
    }

    pub fn is_being_deleted(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    pub fn has_cascade_finalizer(&self) -> bool {
        self.finalizers().iter().any(|f| f == FINALIZER)
    }
}
