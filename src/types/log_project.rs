// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A project in the remote log service, owned by this resource
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "logservice.hsc.philips.com.cn", version = "v1", kind = "LogProject")]
#[kube(namespaced)]
#[kube(status = "LogProjectStatus")]
#[kube(shortname = "lp")]
#[kube(printcolumn = r#"{"name":"Project","type":"string","jsonPath":".spec.name"}"#)]
#[serde(rename_all = "camelCase")]
pub struct LogProjectSpec {
    /// Remote project name; must not change once the project is created
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogProjectStatus {
    /// Spec as last confirmed against the log service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<LogProjectSpec>,
}

impl LogProject {
    /// Check if deletion of this resource has been requested
    pub fn is_deletion_requested(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    /// Check if the recorded status already mirrors the spec
    pub fn status_mirrors_spec(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.spec.as_ref())
            .is_some_and(|observed| *observed == self.spec)
    }

    /// Remote project name recorded once the project was confirmed to exist
    pub fn observed_project_name(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.spec.as_ref())
            .map(|observed| observed.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Status snapshot for the current spec
    pub fn observed_status(&self) -> LogProjectStatus {
        LogProjectStatus {
            spec: Some(self.spec.clone()),
        }
    }
}
