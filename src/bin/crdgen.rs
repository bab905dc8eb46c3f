// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the LogProject CustomResourceDefinition as YAML.

use kube::CustomResourceExt;
use logservice_operator::types::LogProject;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&LogProject::crd())?);
    Ok(())
}
