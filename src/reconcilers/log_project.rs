// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! LogProject reconciler - keeps remote log service projects in step with
//! LogProject resources.

use crate::config::Config;
use crate::constants::FINALIZER;
use crate::error::{OperatorError, Result};
use crate::finalizers::{replace_finalizers, FinalizerSet};
use crate::logservice::ProjectService;
use crate::types::LogProject;
use futures::StreamExt;
use kube::{
    api::{Patch, PatchParams},
    runtime::{controller::Action, reflector::ObjectRef, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// What a reconciliation does with a LogProject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Ensure the remote project exists and the finalizer is attached
    Add,
    /// Delete the remote project and release the finalizer
    Delete,
    /// The resource is gone, nothing to do
    Poll,
}

impl ReconcileAction {
    pub fn for_project(project: Option<&LogProject>) -> Self {
        match project {
            None => ReconcileAction::Poll,
            Some(p) if p.is_deletion_requested() => ReconcileAction::Delete,
            Some(_) => ReconcileAction::Add,
        }
    }
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcileAction::Add => "Add",
            ReconcileAction::Delete => "Delete",
            ReconcileAction::Poll => "Poll",
        };
        f.write_str(name)
    }
}

pub struct LogProjectReconciler {
    client: Client,
    service: Arc<dyn ProjectService>,
    config: Config,
}

impl LogProjectReconciler {
    pub fn new(client: Client, service: Arc<dyn ProjectService>, config: Config) -> Self {
        Self {
            client,
            service,
            config,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let projects: Api<LogProject> = match &self.config.watch_namespace {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        };
        let context = Arc::new(self);

        Controller::new(projects, WatcherConfig::default())
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled LogProject: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    /// Load the current LogProject for `identity` and converge the remote project.
    ///
    /// Performs at most one remote read, one remote write, one status write and
    /// one finalizer write. Errors are returned as-is; retrying is left to the
    /// controller.
    #[instrument(skip(self, identity), fields(logproject = %identity))]
    pub async fn reconcile(&self, identity: &ObjectRef<LogProject>) -> Result<ReconcileAction> {
        let namespace = identity.namespace.as_deref().ok_or_else(|| {
            OperatorError::InvalidObject(format!("LogProject {} has no namespace", identity.name))
        })?;
        let api: Api<LogProject> = Api::namespaced(self.client.clone(), namespace);

        let project = api.get_opt(&identity.name).await?;
        let action = ReconcileAction::for_project(project.as_ref());
        debug!("Reconcile action: {}", action);

        match (action, project) {
            (ReconcileAction::Poll, _) | (_, None) => {
                debug!("LogProject no longer exists, nothing to do");
            }
            (ReconcileAction::Add, Some(project)) => self.apply(&api, project).await?,
            (ReconcileAction::Delete, Some(project)) => self.cleanup(&api, project).await?,
        }

        Ok(action)
    }

    async fn apply(&self, api: &Api<LogProject>, mut project: LogProject) -> Result<()> {
        let project_name = project.spec.name.clone();
        if project_name.is_empty() {
            return Err(OperatorError::InvalidObject(format!(
                "LogProject {} has an empty spec.name",
                project.name_any()
            )));
        }
        if let Some(observed) = project.observed_project_name() {
            if observed != project_name {
                return Err(OperatorError::InvalidObject(format!(
                    "LogProject {} renames project {} to {}; spec.name is immutable",
                    project.name_any(),
                    observed,
                    project_name
                )));
            }
        }
        info!("Reconciling LogProject: {}", project_name);

        if self.service.project_exists(&project_name).await? {
            debug!("Project {} already exists", project_name);
        } else {
            info!("Creating project {}", project_name);
            self.service
                .create_project(&project_name, &project.spec.description)
                .await?;
            info!("Project created successfully: {}", project_name);
        }

        if !project.status_mirrors_spec() {
            let patch = json!({ "status": project.observed_status() });
            project = api
                .patch_status(&project.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
                .await?;
        }

        let mut finalizers = FinalizerSet::from_resource(&project);
        if finalizers.insert(FINALIZER) {
            replace_finalizers(api, &project, &finalizers).await?;
            info!("Added finalizer to LogProject {}", project.name_any());
        }

        Ok(())
    }

    async fn cleanup(&self, api: &Api<LogProject>, project: LogProject) -> Result<()> {
        let mut finalizers = FinalizerSet::from_resource(&project);
        if !finalizers.contains(FINALIZER) {
            debug!("LogProject {} has no finalizer, nothing to clean up", project.name_any());
            return Ok(());
        }

        // The name in status is the one that was actually created remotely
        let project_name = project
            .observed_project_name()
            .unwrap_or(&project.spec.name)
            .to_string();
        if project_name.is_empty() {
            warn!(
                "LogProject {} never named a project, releasing finalizer",
                project.name_any()
            );
        } else {
            info!("Deleting project {}", project_name);
            match self.service.delete_project(&project_name).await {
                Ok(()) => info!("Project deleted successfully: {}", project_name),
                Err(e) if e.is_project_not_exist() => {
                    warn!("Project {} was already deleted", project_name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        finalizers.remove(FINALIZER);
        replace_finalizers(api, &project, &finalizers).await?;
        info!("Removed finalizer from LogProject {}", project.name_any());

        Ok(())
    }

    /// Controller action after a successful reconciliation
    fn next_action(&self, action: ReconcileAction) -> Action {
        match (action, self.config.resync_interval) {
            (ReconcileAction::Add, Some(interval)) => Action::requeue(interval),
            _ => Action::await_change(),
        }
    }
}

async fn reconcile(project: Arc<LogProject>, ctx: Arc<LogProjectReconciler>) -> Result<Action> {
    let action = ctx.reconcile(&ObjectRef::from_obj(&*project)).await?;
    Ok(ctx.next_action(action))
}

fn error_policy(
    project: Arc<LogProject>,
    error: &OperatorError,
    ctx: Arc<LogProjectReconciler>,
) -> Action {
    error!(
        "Reconciliation error for LogProject {}: {}",
        project.name_any(),
        error
    );
    Action::requeue(ctx.config.error_requeue)
}
