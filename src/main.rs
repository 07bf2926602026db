// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::{Client, CustomResourceExt};
use tracing::{info, warn};

use cakephp_operator::config::Config;
use cakephp_operator::kubernetes::wait_for_crds;
use cakephp_operator::reconcilers::CakephpReconciler;
use cakephp_operator::types::Cakephp;

#[tokio::main]
async fn main() -> Result<()> {
    // `cakephp-operator crd` prints the CRD manifest for installation
    if std::env::args().nth(1).as_deref() == Some("crd") {
        print!("{}", serde_yaml::to_string(&Cakephp::crd())?);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Cakephp operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={:?}, cascade_finalizer={}",
        config.watch_namespace, config.cascade_finalizer
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // The controller watches Routes, so both CRDs must be served before it starts
    info!("Waiting for Cakephp and Route CRDs to become available...");
    wait_for_crds(&client).await?;

    info!("Starting reconciler...");
    CakephpReconciler::new(client, config).run().await?;

    // This should never be reached as the reconciler runs forever
    warn!("Reconciler stopped unexpectedly");
    Ok(())
}
