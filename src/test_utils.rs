// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking the Kubernetes API and the log service.

use crate::config::{Config, Credentials};
use crate::constants::{crd, logservice::PROJECT_NOT_EXIST};
use crate::logservice::{LogServiceError, ProjectService};
use async_trait::async_trait;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// Configuration pointing at a log service that is never contacted
pub fn test_config() -> Config {
    Config {
        region: "cn-shanghai".to_string(),
        credentials: Credentials {
            access_key_id: "key-id".to_string(),
            access_key_secret: "key-secret".to_string(),
            security_token: None,
        },
        scheme: "https".to_string(),
        endpoint: "cn-shanghai.log.aliyuncs.com".to_string(),
        watch_namespace: None,
        error_requeue: Duration::from_secs(60),
        resync_interval: None,
    }
}

/// A request received by the [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: serde_json::Value,
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with the given method matching the path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received so far with the given method
    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for subresources like .../status
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path: path.clone(),
                body,
            });

            match response {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = not_found_json("logprojects", &path);
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.into_bytes()))
                        .unwrap())
                }
            }
        })
    }
}

/// API path of a namespaced LogProject
pub fn log_project_path(namespace: &str, name: &str) -> String {
    format!(
        "/apis/{}/{}/namespaces/{}/logprojects/{}",
        crd::GROUP,
        crd::VERSION,
        namespace,
        name
    )
}

/// Create a mock LogProject JSON response in the default namespace
pub fn log_project_json(
    name: &str,
    project_name: &str,
    description: &str,
    finalizers: &[&str],
    deleting: bool,
) -> String {
    let mut project = serde_json::json!({
        "apiVersion": format!("{}/{}", crd::GROUP, crd::VERSION),
        "kind": crd::KIND,
        "metadata": {
            "name": name,
            "namespace": "default",
            "uid": "test-uid",
            "resourceVersion": "1",
            "finalizers": finalizers,
        },
        "spec": {
            "name": project_name,
            "description": description,
        }
    });
    if deleting {
        project["metadata"]["deletionTimestamp"] = serde_json::json!("2026-01-01T00:00:00Z");
    }
    project.to_string()
}

/// Same as [`log_project_json`] with a status that mirrors the spec
pub fn observed_log_project_json(
    name: &str,
    project_name: &str,
    description: &str,
    finalizers: &[&str],
) -> String {
    with_observed_spec(
        &log_project_json(name, project_name, description, finalizers, false),
        project_name,
        description,
    )
}

/// Set `status.spec` of a LogProject JSON document
pub fn with_observed_spec(body: &str, project_name: &str, description: &str) -> String {
    let mut project: serde_json::Value = serde_json::from_str(body).unwrap();
    project["status"] = serde_json::json!({
        "spec": { "name": project_name, "description": description }
    });
    project.to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// A call received by the [`FakeProjectService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Exists(String),
    Create { name: String, description: String },
    Delete(String),
}

/// In-memory log service that records every call
#[derive(Default)]
pub struct FakeProjectService {
    projects: Mutex<BTreeSet<String>>,
    calls: Mutex<Vec<ServiceCall>>,
    fail_writes: bool,
}

impl FakeProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing remote project
    pub fn with_project(self, name: &str) -> Self {
        self.projects.lock().unwrap().insert(name.to_string());
        self
    }

    /// Make create and delete calls fail with a server error
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change remote state
    pub fn write_calls(&self) -> Vec<ServiceCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, ServiceCall::Exists(_)))
            .collect()
    }

    pub fn has_project(&self, name: &str) -> bool {
        self.projects.lock().unwrap().contains(name)
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn server_error() -> LogServiceError {
        LogServiceError::Api {
            status: 500,
            code: "InternalServerError".to_string(),
            message: "injected failure".to_string(),
            request_id: None,
        }
    }
}

#[async_trait]
impl ProjectService for FakeProjectService {
    async fn project_exists(&self, name: &str) -> Result<bool, LogServiceError> {
        self.record(ServiceCall::Exists(name.to_string()));
        Ok(self.has_project(name))
    }

    async fn create_project(&self, name: &str, description: &str) -> Result<(), LogServiceError> {
        self.record(ServiceCall::Create {
            name: name.to_string(),
            description: description.to_string(),
        });
        if self.fail_writes {
            return Err(Self::server_error());
        }
        self.projects.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    async fn delete_project(&self, name: &str) -> Result<(), LogServiceError> {
        self.record(ServiceCall::Delete(name.to_string()));
        if self.fail_writes {
            return Err(Self::server_error());
        }
        if !self.projects.lock().unwrap().remove(name) {
            return Err(LogServiceError::Api {
                status: 404,
                code: PROJECT_NOT_EXIST.to_string(),
                message: format!("Project {} does not exist", name),
                request_id: None,
            });
        }
        Ok(())
    }
}
