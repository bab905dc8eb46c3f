// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request signing for the SLS REST API (signature version 1, HMAC-SHA1)

use super::LogServiceError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

/// Uppercase hex MD5 of a request body, as sent in `Content-MD5`
pub fn content_md5(body: &[u8]) -> String {
    hex::encode_upper(Md5::digest(body))
}

/// Canonical string a request signature is computed over.
///
/// `headers` must hold every request header; only `x-log-*` and `x-acs-*`
/// headers take part, lowercased and sorted by name.
pub fn string_to_sign(
    method: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    headers: &BTreeMap<String, String>,
    resource: &str,
) -> String {
    let canonical_headers: BTreeMap<String, &str> = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.as_str()))
        .filter(|(k, _)| k.starts_with("x-log-") || k.starts_with("x-acs-"))
        .collect();

    let mut out = format!("{}\n{}\n{}\n{}\n", method, content_md5, content_type, date);
    for (key, value) in &canonical_headers {
        out.push_str(key);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(resource);
    out
}

/// Base64 HMAC-SHA1 of `string_to_sign` keyed with the access key secret
pub fn sign(access_key_secret: &str, string_to_sign: &str) -> Result<String, LogServiceError> {
    let mut mac = HmacSha1::new_from_slice(access_key_secret.as_bytes())
        .map_err(|e| LogServiceError::InvalidKey(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Value of the `Authorization` header
pub fn authorization(access_key_id: &str, signature: &str) -> String {
    format!("LOG {}:{}", access_key_id, signature)
}
