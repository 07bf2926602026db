// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{demo::IMAGE, OPERATOR_NAME};
use crate::error::{OperatorError, Result};
use crate::types::{Cakephp, CakephpStatus};
use kube::{
    api::{Patch, PatchParams},
    Api, ResourceExt,
};
use serde_json::json;
use tracing::{debug, error};

fn field_manager() -> PatchParams {
    PatchParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    }
}

/// Record the application image on the instance status subresource
pub async fn update_status(instances: &Api<Cakephp>, instance: &Cakephp) -> Result<()> {
    let name = instance.name_any();
    let status = json!({
        "status": CakephpStatus {
            pod_status: IMAGE.to_string(),
        }
    });

    instances
        .patch_status(&name, &field_manager(), &Patch::Merge(&status))
        .await
        .map_err(|e| {
            error!("Failed to update status of {}: {}", name, e);
            OperatorError::StatusWriteError(
                format!("{}/{}", instance.namespace().unwrap_or_default(), name),
                e,
            )
        })?;

    debug!("Status of {} set to {}", name, IMAGE);
    Ok(())
}
