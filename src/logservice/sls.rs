// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the project API of Alibaba Cloud Log Service

use super::signature::{authorization, content_md5, sign, string_to_sign};
use super::{LogServiceError, ProjectService};
use crate::config::{Config, Credentials};
use crate::constants::logservice::{API_VERSION, REQUEST_TIMEOUT_SECS, SIGNATURE_METHOD};
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, instrument};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Signed SLS client. Project requests go to `{scheme}://{project}.{endpoint}/`.
pub struct SlsClient {
    http: reqwest::Client,
    scheme: String,
    endpoint: String,
    credentials: Credentials,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectRequest<'a> {
    project_name: &'a str,
    description: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ErrorBody {
    error_code: String,
    error_message: String,
}

impl SlsClient {
    pub fn new(config: &Config) -> Result<Self, LogServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_http_client(http, config))
    }

    pub fn with_http_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            scheme: config.scheme.clone(),
            endpoint: config.endpoint.clone(),
            credentials: config.credentials.clone(),
        }
    }

    fn project_url(&self, project: &str) -> String {
        format!("{}://{}.{}/", self.scheme, project, self.endpoint)
    }

    /// Send a signed request against a project's root resource
    async fn send(
        &self,
        method: Method,
        project: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response, LogServiceError> {
        let date = httpdate::fmt_http_date(SystemTime::now());
        let body = body.unwrap_or_default();

        let mut headers = BTreeMap::from([
            ("x-log-apiversion".to_string(), API_VERSION.to_string()),
            ("x-log-signaturemethod".to_string(), SIGNATURE_METHOD.to_string()),
            ("x-log-bodyrawsize".to_string(), body.len().to_string()),
        ]);
        if let Some(token) = &self.credentials.security_token {
            headers.insert("x-acs-security-token".to_string(), token.clone());
        }

        let (md5, content_type) = if body.is_empty() {
            (String::new(), String::new())
        } else {
            (content_md5(&body), JSON_CONTENT_TYPE.to_string())
        };

        let to_sign = string_to_sign(method.as_str(), &md5, &content_type, &date, &headers, "/");
        let signature = sign(&self.credentials.access_key_secret, &to_sign)?;

        let mut request = self
            .http
            .request(method, self.project_url(project))
            .header("Date", &date)
            .header(
                "Authorization",
                authorization(&self.credentials.access_key_id, &signature),
            );
        for (key, value) in &headers {
            request = request.header(key, value);
        }
        if !body.is_empty() {
            request = request
                .header("Content-Type", content_type)
                .header("Content-MD5", md5);
        }

        let response = request.body(body).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }
}

/// Convert a non-success response into an API error
async fn api_error(response: Response) -> LogServiceError {
    let status = response.status().as_u16();
    let request_id = response
        .headers()
        .get("x-log-requestid")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let text = response.text().await.unwrap_or_default();

    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let (code, message) = if body.error_code.is_empty() {
        ("Unknown".to_string(), text)
    } else {
        (body.error_code, body.error_message)
    };

    LogServiceError::Api {
        status,
        code,
        message,
        request_id,
    }
}

#[async_trait]
impl ProjectService for SlsClient {
    #[instrument(skip(self))]
    async fn project_exists(&self, name: &str) -> Result<bool, LogServiceError> {
        match self.send(Method::GET, name, None).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_project_not_exist() => {
                debug!("Project {} does not exist", name);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, description))]
    async fn create_project(&self, name: &str, description: &str) -> Result<(), LogServiceError> {
        let body = serde_json::to_vec(&CreateProjectRequest {
            project_name: name,
            description,
        })?;

        self.send(Method::POST, name, Some(body)).await?;
        info!("Created project {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, name: &str) -> Result<(), LogServiceError> {
        self.send(Method::DELETE, name, None).await?;
        info!("Deleted project {}", name);
        Ok(())
    }
}
