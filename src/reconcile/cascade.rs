// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Explicit cascade deletion and the finalizer that guards it.

use crate::constants::{FINALIZER, OPERATOR_NAME};
use crate::error::Result;
use crate::resources::ManagedResource;
use crate::types::{Cakephp, Route};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Secret, Service};
use kube::{
    api::{DeleteParams, Patch, PatchParams},
    Api, Client, Resource, ResourceExt,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt::Debug;
use tracing::{debug, error, info, instrument};

/// Delete `name` if it exists and is owned by the object with `owner_uid`.
/// Returns whether a delete was issued.
async fn delete_owned<K>(api: &Api<K>, name: &str, owner_uid: &str) -> Result<bool>
where
    K: Resource<DynamicType = ()> + Clone + Debug + DeserializeOwned,
{
    let Some(live) = api.get_opt(name).await? else {
        debug!("{} {} already gone", K::kind(&()), name);
        return Ok(false);
    };

    if !live.owner_references().iter().any(|o| o.uid == owner_uid) {
        debug!("{} {} is not owned by this instance, keeping it", K::kind(&()), name);
        return Ok(false);
    }

    info!("Deleting {} {}", K::kind(&()), name);
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(true),
        Err(kube::Error::Api(err)) if err.code == 404 => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Delete every managed resource owned by `instance`, dependents first.
/// Returns the number of deleted resources.
#[instrument(skip(client, instance), fields(instance = %instance.name_any()))]
pub async fn cascade_delete(client: &Client, instance: &Cakephp) -> Result<usize> {
    let namespace = instance.namespace().unwrap_or_default();
    let Some(owner_uid) = instance.uid() else {
        return Ok(0);
    };

    let secrets: Api<Secret> = Api::namespaced(client.clone(), &namespace);
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), &namespace);
    let services: Api<Service> = Api::namespaced(client.clone(), &namespace);
    let routes: Api<Route> = Api::namespaced(client.clone(), &namespace);

    let mut deleted = 0;
    for resource in ManagedResource::ALL.iter().rev() {
        let name = resource.name(instance);
        let removed = match resource {
            ManagedResource::Credential => delete_owned(&secrets, &name, &owner_uid).await?,
            ManagedResource::DatabaseDeployment | ManagedResource::DemoDeployment => {
                delete_owned(&deployments, &name, &owner_uid).await?
            }
            ManagedResource::DatabaseService | ManagedResource::DemoService => {
                delete_owned(&services, &name, &owner_uid).await?
            }
            ManagedResource::DemoRoute => delete_owned(&routes, &name, &owner_uid).await?,
        };
        if removed {
            deleted += 1;
        }
    }

    info!("Deleted {} managed resources", deleted);
    Ok(deleted)
}

/// Add the cascade finalizer to the instance if it is not there yet.
///
/// The patch tests the finalizer list it was computed from, so a concurrent
/// change by another actor fails the write instead of being overwritten.
pub async fn add_finalizer(instances: &Api<Cakephp>, instance: &Cakephp) -> Result<()> {
    if instance.has_cascade_finalizer() {
        return Ok(());
    }

    let ops = if instance.finalizers().is_empty() {
        json!([
            { "op": "test", "path": "/metadata/finalizers", "value": null },
            { "op": "add", "path": "/metadata/finalizers", "value": [FINALIZER] }
        ])
    } else {
        json!([
            { "op": "test", "path": "/metadata/finalizers", "value": instance.finalizers() },
            { "op": "add", "path": "/metadata/finalizers/-", "value": FINALIZER }
        ])
    };
    debug!("Adding finalizer {} to {}", FINALIZER, instance.name_any());
    patch_finalizers(instances, instance, ops).await
}

/// Remove the cascade finalizer so the store can complete the deletion
pub async fn remove_finalizer(instances: &Api<Cakephp>, instance: &Cakephp) -> Result<()> {
    let Some(index) = instance.finalizers().iter().position(|f| f == FINALIZER) else {
        return Ok(());
    };

    let path = format!("/metadata/finalizers/{}", index);
    let ops = json!([
        { "op": "test", "path": path, "value": FINALIZER },
        { "op": "remove", "path": path }
    ]);
    debug!("Removing finalizer {} from {}", FINALIZER, instance.name_any());
    patch_finalizers(instances, instance, ops).await
}

async fn patch_finalizers(instances: &Api<Cakephp>, instance: &Cakephp, ops: Value) -> Result<()> {
    let patch: json_patch::Patch = serde_json::from_value(ops)?;
    instances
        .patch(
            &instance.name_any(),
            &PatchParams {
                field_manager: Some(OPERATOR_NAME.to_string()),
                ..Default::default()
            },
            &Patch::Json::<()>(patch),
        )
        .await
        .inspect_err(|e| error!("Failed to update finalizers of {}: {}", instance.name_any(), e))?;
    Ok(())
}
