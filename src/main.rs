// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use std::sync::Arc;
use tracing::{info, warn};

use logservice_operator::config::Config;
use logservice_operator::kubernetes::wait_for_log_project_crd;
use logservice_operator::logservice::SlsClient;
use logservice_operator::reconcilers::LogProjectReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting LogService operator");

    // Load configuration once; reconciliations never read the environment
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: region={}, endpoint={}://{}, watch_namespace={}",
        config.region,
        config.scheme,
        config.endpoint,
        config.watch_namespace.as_deref().unwrap_or("<all>")
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for LogProject CRD to become available...");
    wait_for_log_project_crd(&client).await?;

    let service = SlsClient::new(&config).context("Failed to create log service client")?;
    let reconciler = LogProjectReconciler::new(client, Arc::new(service), config);

    info!("Starting LogProject reconciler...");
    reconciler.run().await?;

    warn!("LogProject reconciler stopped");
    Ok(())
}
