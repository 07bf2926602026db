// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API server behind a kube Client.
//!
//! Objects are stored as JSON keyed by their item path, so the same server
//! serves typed reads, creates, replaces, merge and JSON patches and deletes
//! for any kind.

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::{Client, Resource};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Default)]
struct State {
    objects: BTreeMap<String, Value>,
    /// (method, path prefix, status code) answered with a failure
    failures: Vec<(Method, String, u16)>,
    requests: Vec<(Method, String)>,
    next_uid: u64,
}

/// A stateful fake API server.
#[derive(Clone, Default)]
pub struct FakeApiServer {
    state: Arc<Mutex<State>>,
}

/// Item path of a namespaced object of kind `K`
pub fn item_path<K: Resource<DynamicType = ()>>(namespace: &str, name: &str) -> String {
    format!("{}/{}", K::url_path(&(), Some(namespace)), name)
}

impl FakeApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a kube Client talking to this server
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// Store an object directly, bypassing request recording
    pub fn insert<K>(&self, object: &K)
    where
        K: Resource<DynamicType = ()> + serde::Serialize,
    {
        let meta = object.meta();
        let path = item_path::<K>(
            meta.namespace.as_deref().unwrap_or("default"),
            meta.name.as_deref().unwrap_or_default(),
        );
        let value = serde_json::to_value(object).unwrap();
        self.state.lock().unwrap().objects.insert(path, value);
    }

    pub fn get<K: Resource<DynamicType = ()>>(&self, namespace: &str, name: &str) -> Option<Value> {
        let path = item_path::<K>(namespace, name);
        self.state.lock().unwrap().objects.get(&path).cloned()
    }

    /// Typed read of a stored object
    pub fn get_typed<K>(&self, namespace: &str, name: &str) -> Option<K>
    where
        K: Resource<DynamicType = ()> + serde::de::DeserializeOwned,
    {
        self.get::<K>(namespace, name)
            .map(|v| serde_json::from_value(v).unwrap())
    }

    pub fn contains<K: Resource<DynamicType = ()>>(&self, namespace: &str, name: &str) -> bool {
        self.get::<K>(namespace, name).is_some()
    }

    /// Mutate a stored object in place, as another actor in the cluster would
    pub fn modify<K, F>(&self, namespace: &str, name: &str, f: F)
    where
        K: Resource<DynamicType = ()>,
        F: FnOnce(&mut Value),
    {
        let path = item_path::<K>(namespace, name);
        let mut state = self.state.lock().unwrap();
        let object = state.objects.get_mut(&path).expect("object to modify must exist");
        f(object);
    }

    /// Answer requests with this method under the path prefix with an error status
    pub fn fail_on(&self, method: Method, path_prefix: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((method, path_prefix.to_string(), status));
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Recorded requests that would change cluster state
    pub fn writes(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .filter(|(m, _)| *m != Method::GET)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    fn handle(&self, method: Method, path: String, content_type: &str, body: Bytes) -> (u16, Value) {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method.clone(), path.clone()));

        if let Some((_, _, code)) = state
            .failures
            .iter()
            .find(|(m, prefix, _)| *m == method && path.starts_with(prefix.as_str()))
        {
            return (*code, status_json(*code, "InternalError", "injected failure"));
        }

        match method {
            Method::GET => match state.objects.get(&path) {
                Some(object) => (200, object.clone()),
                None => (404, status_json(404, "NotFound", "not found")),
            },
            Method::POST => {
                let mut object: Value = serde_json::from_slice(&body).unwrap();
                let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                let key = format!("{}/{}", path, name);
                if state.objects.contains_key(&key) {
                    return (409, status_json(409, "AlreadyExists", "already exists"));
                }
                state.next_uid += 1;
                object["metadata"]["uid"] = json!(format!("uid-{}", state.next_uid));
                object["metadata"]["resourceVersion"] = json!("1");
                state.objects.insert(key, object.clone());
                (201, object)
            }
            Method::PUT => {
                if !state.objects.contains_key(&path) {
                    return (404, status_json(404, "NotFound", "not found"));
                }
                let object: Value = serde_json::from_slice(&body).unwrap();
                state.objects.insert(path, object.clone());
                (200, object)
            }
            Method::PATCH => {
                let key = path.strip_suffix("/status").unwrap_or(&path).to_string();
                let patch: Value = serde_json::from_slice(&body).unwrap();
                let Some(object) = state.objects.get_mut(&key) else {
                    return (404, status_json(404, "NotFound", "not found"));
                };
                if content_type == "application/json-patch+json" {
                    if let Err(e) = json_patch_apply(object, patch) {
                        return (422, status_json(422, "Invalid", &e.to_string()));
                    }
                } else {
                    merge_patch(object, &patch);
                }
                (200, object.clone())
            }
            Method::DELETE => match state.objects.remove(&path) {
                Some(object) => (200, object),
                None => (404, status_json(404, "NotFound", "not found")),
            },
            _ => (405, status_json(405, "MethodNotAllowed", "method not allowed")),
        }
    }
}

impl Service<Request<Body>> for FakeApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let content_type = req
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Box::pin(async move {
            let body = req
                .into_body()
                .collect()
                .await
                .map(|collected| collected.to_bytes())
                .unwrap_or_default();
            let (status, value) = server.handle(method, path, &content_type, body);
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&value).unwrap()))
                .unwrap())
        })
    }
}

/// RFC 7386 JSON merge patch
fn merge_patch(target: &mut Value, patch: &Value) {
    match patch {
        Value::Object(fields) => {
            if !target.is_object() {
                *target = json!({});
            }
            let object = target.as_object_mut().unwrap();
            for (key, value) in fields {
                if value.is_null() {
                    object.remove(key);
                } else {
                    merge_patch(object.entry(key.clone()).or_insert(Value::Null), value);
                }
            }
        }
        other => *target = other.clone(),
    }
}

/// RFC 6902 JSON patch. A `test` for null passes on a missing path, as it
/// does on a real API server.
fn json_patch_apply(target: &mut Value, mut ops: Value) -> Result<(), json_patch::PatchError> {
    if let Some(list) = ops.as_array_mut() {
        list.retain(|op| {
            let path = op["path"].as_str().unwrap_or_default();
            !(op["op"] == "test" && op["value"].is_null() && target.pointer(path).is_none())
        });
    }
    let patch: json_patch::Patch = serde_json::from_value(ops).unwrap();
    json_patch::patch(target, &patch)
}

fn status_json(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_patch_semantics() {
        let mut target = json!({ "a": 1, "b": { "c": 2, "d": 3 } });
        merge_patch(&mut target, &json!({ "b": { "c": null, "e": 4 }, "f": [1] }));
        assert_eq!(target, json!({ "a": 1, "b": { "d": 3, "e": 4 }, "f": [1] }));
    }

    #[test]
    fn test_json_patch_test_op_guards_the_write() {
        let mut target = json!({ "metadata": { "finalizers": ["a", "b"] } });
        let ops = json!([
            { "op": "test", "path": "/metadata/finalizers", "value": ["a"] },
            { "op": "add", "path": "/metadata/finalizers/-", "value": "c" }
        ]);

        assert!(json_patch_apply(&mut target, ops).is_err());
        assert_eq!(target, json!({ "metadata": { "finalizers": ["a", "b"] } }));
    }

    #[test]
    fn test_json_patch_null_test_on_missing_path() {
        let mut target = json!({ "metadata": {} });
        let ops = json!([
            { "op": "test", "path": "/metadata/finalizers", "value": null },
            { "op": "add", "path": "/metadata/finalizers", "value": ["a"] }
        ]);

        json_patch_apply(&mut target, ops).unwrap();
        assert_eq!(target, json!({ "metadata": { "finalizers": ["a"] } }));
    }
}
