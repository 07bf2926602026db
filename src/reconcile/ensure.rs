// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-if-missing for any managed kind.

use crate::constants::OPERATOR_NAME;
use crate::error::Result;
use kube::{api::PostParams, Api, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Make sure `desired` exists. An existing object is left untouched, whatever its content.
#[instrument(skip(api, desired), fields(kind = %K::kind(&()), name = %desired.name_any()))]
pub async fn ensure<K>(api: &Api<K>, desired: &K) -> Result<EnsureOutcome>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned,
{
    let name = desired.name_any();

    if api.get_opt(&name).await?.is_some() {
        debug!("{} {} already exists", K::kind(&()), name);
        return Ok(EnsureOutcome::AlreadyExists);
    }

    info!("Creating {} {}", K::kind(&()), name);
    let pp = PostParams {
        field_manager: Some(OPERATOR_NAME.to_string()),
        ..Default::default()
    };
    api.create(&pp, desired)
        .await
        .inspect_err(|e| error!("Failed to create {} {}: {}", K::kind(&()), name, e))?;

    Ok(EnsureOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperatorError;
    use crate::test_utils::{item_path, FakeApiServer};
    use http::Method;
    use k8s_openapi::api::core::v1::Service;
    use kube::api::ObjectMeta;

    fn make_service(name: &str, port_label: &str) -> Service {
        Service {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("demo".to_string()),
                labels: Some([("port".to_string(), port_label.to_string())].into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_creates_missing_object() {
        let server = FakeApiServer::new();
        let api: Api<Service> = Api::namespaced(server.client(), "demo");

        let outcome = ensure(&api, &make_service("mysql", "a")).await.unwrap();

        assert_eq!(outcome, EnsureOutcome::Created);
        assert!(server.contains::<Service>("demo", "mysql"));
        assert_eq!(server.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_object_is_not_touched() {
        let server = FakeApiServer::new();
        server.insert(&make_service("mysql", "old"));
        let api: Api<Service> = Api::namespaced(server.client(), "demo");

        let outcome = ensure(&api, &make_service("mysql", "new")).await.unwrap();

        assert_eq!(outcome, EnsureOutcome::AlreadyExists);
        assert!(server.writes().is_empty());
        let live: Service = server.get_typed("demo", "mysql").unwrap();
        assert_eq!(live.metadata.labels.unwrap().get("port").unwrap(), "old");
    }

    #[tokio::test]
    async fn test_read_error_is_propagated_without_create() {
        let server = FakeApiServer::new();
        server.fail_on(Method::GET, &item_path::<Service>("demo", "mysql"), 500);
        let api: Api<Service> = Api::namespaced(server.client(), "demo");

        let err = ensure(&api, &make_service("mysql", "a")).await.unwrap_err();

        assert!(matches!(err, OperatorError::KubeError(_)));
        assert!(server.writes().is_empty());
    }

    #[tokio::test]
    async fn test_create_error_is_propagated() {
        let server = FakeApiServer::new();
        server.fail_on(Method::POST, "/api/v1/namespaces/demo/services", 500);
        let api: Api<Service> = Api::namespaced(server.client(), "demo");

        let result = ensure(&api, &make_service("mysql", "a")).await;

        assert!(result.is_err());
        assert!(!server.contains::<Service>("demo", "mysql"));
        assert_eq!(server.writes().len(), 1);
    }
}
