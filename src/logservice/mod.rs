// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Remote log service: the project operations the reconciler needs and an
//! Alibaba Cloud Log Service (SLS) implementation.

pub mod signature;
pub mod sls;

use crate::constants::logservice::PROJECT_NOT_EXIST;
use async_trait::async_trait;
use thiserror::Error;

pub use sls::SlsClient;

#[derive(Error, Debug)]
pub enum LogServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{code} ({status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

impl LogServiceError {
    /// True if the service reported that the project does not exist
    pub fn is_project_not_exist(&self) -> bool {
        matches!(self, LogServiceError::Api { code, .. } if code == PROJECT_NOT_EXIST)
    }
}

/// Project operations of the remote log service
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn project_exists(&self, name: &str) -> Result<bool, LogServiceError>;

    async fn create_project(&self, name: &str, description: &str) -> Result<(), LogServiceError>;

    async fn delete_project(&self, name: &str) -> Result<(), LogServiceError>;
}
