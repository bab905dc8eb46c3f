// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::logservice::LogServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Log service error: {0}")]
    LogServiceError(#[from] LogServiceError),

    #[error("Invalid object: {0}")]
    InvalidObject(String),
}

pub type Result<T> = std::result::Result<T, OperatorError>;
