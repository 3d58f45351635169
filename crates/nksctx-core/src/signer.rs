//! Request signing for the NCP API gateway (signature v2).
//!
//! The signed message is `"{METHOD} {URL}\n{TIMESTAMP}\n{ACCESS_KEY}"`, where `URL` is the
//! request path with `?query` appended when a query string is present. The digest is
//! HMAC-SHA256 keyed by the secret key, base64 encoded with padding.

use std::borrow::Cow;

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_TIMESTAMP: &str = "x-ncp-apigw-timestamp";
pub const HEADER_ACCESS_KEY: &str = "x-ncp-iam-access-key";
pub const HEADER_SIGNATURE: &str = "x-ncp-apigw-signature-v2";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

pub fn sign(method: &str, uri: &str, query: &str, timestamp: &str, access_key: &str, secret_key: &str) -> String {
    let url = if query.is_empty() { Cow::Borrowed(uri) } else { Cow::Owned(format!("{uri}?{query}")) };
    let message = format!("{method} {url}\n{timestamp}\n{access_key}");

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// The four headers every signed request carries.
pub fn auth_headers(
    method: &str,
    url: &str,
    timestamp_ms: i64,
    access_key: &str,
    secret_key: &str,
) -> Vec<(&'static str, String)> {
    let timestamp = timestamp_ms.to_string();
    let signature = sign(method, &extract_uri(url), extract_query(url), &timestamp, access_key, secret_key);

    vec![
        (HEADER_TIMESTAMP, timestamp),
        (HEADER_ACCESS_KEY, access_key.to_string()),
        (HEADER_SIGNATURE, signature),
        (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON.to_string()),
    ]
}

/// Path component of a URL without scheme, host or query. A bare host yields `/`.
pub fn extract_uri(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "/",
    };
    path.split_once('?').map_or(path, |(path, _)| path).to_string()
}

pub fn extract_query(url: &str) -> &str {
    url.split_once('?').map_or("", |(_, query)| query)
}
