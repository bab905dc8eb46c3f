// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Finalizer that holds a LogProject until its remote project is deleted
pub const FINALIZER: &str = "logservice.project.finalizer.hsc.philips.com";

/// LogProject CRD identity and polling configuration
pub mod crd {
    pub const GROUP: &str = "logservice.hsc.philips.com.cn";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "LogProject";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Alibaba Cloud Log Service (SLS) protocol constants
pub mod logservice {
    pub const API_VERSION: &str = "0.6.0";
    pub const SIGNATURE_METHOD: &str = "hmac-sha1";
    /// Appended to the region to build the default endpoint
    pub const ENDPOINT_SUFFIX: &str = "log.aliyuncs.com";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Error code returned when a project does not exist
    pub const PROJECT_NOT_EXIST: &str = "ProjectNotExist";
}
