// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Finalizer bookkeeping for LogProject resources

use crate::error::Result;
use crate::types::LogProject;
use kube::{
    api::{Patch, PatchParams},
    Api, Resource, ResourceExt,
};
use serde_json::json;
use tracing::{debug, instrument};

/// Ordered, duplicate-free set of finalizer tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizerSet {
    tokens: Vec<String>,
}

impl FinalizerSet {
    /// Build the set from an object's metadata
    pub fn from_resource<K: Resource>(obj: &K) -> Self {
        obj.meta()
            .finalizers
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Append a token, returns false if it was already present
    pub fn insert(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token, returns false if it was not present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

impl FromIterator<String> for FinalizerSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = FinalizerSet::default();
        for token in iter {
            set.insert(&token);
        }
        set
    }
}

/// Write the full finalizer list back to the LogProject.
///
/// The patch carries the resourceVersion the set was read from, so a
/// concurrent change to the object fails with a conflict instead of
/// silently dropping someone else's finalizer.
#[instrument(skip(api, project, finalizers), fields(logproject = %project.name_any()))]
pub async fn replace_finalizers(
    api: &Api<LogProject>,
    project: &LogProject,
    finalizers: &FinalizerSet,
) -> Result<LogProject> {
    let mut metadata = json!({ "finalizers": finalizers.as_slice() });
    if let Some(resource_version) = project.resource_version() {
        metadata["resourceVersion"] = json!(resource_version);
    }

    debug!("Writing finalizers {:?}", finalizers.as_slice());
    let patch = json!({ "metadata": metadata });
    let updated = api
        .patch(&project.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    Ok(updated)
}
