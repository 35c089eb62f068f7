//! Request signing for the Pusher Channels HTTP API.
//!
//! `auth_signature` is the hex HMAC-SHA256 of
//! `"{METHOD}\n{path}\n{query}"`, where `query` is every other parameter
//! sorted by key and joined as `key=value&...`.

use std::collections::BTreeMap;

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Protocol version sent as `auth_version`.
pub const AUTH_VERSION: &str = "1.0";

/// Hex MD5 of a request body, sent as `body_md5`.
pub fn body_md5(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

/// Canonical, key-sorted query string.
pub fn canonical_query(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex HMAC-SHA256 signature over the request line and canonical query.
///
/// # Errors
///
/// Returns [`InvalidLength`] when the MAC rejects `secret` as a key.
pub fn sign(
    secret: &[u8],
    method: &str,
    path: &str,
    canonical_query: &str,
) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(format!("{method}\n{path}\n{canonical_query}").as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Full signed query for a POST with `body`.
///
/// # Errors
///
/// Propagates key rejection from [`sign`].
///
/// # Examples
/// ```
/// use backend::outbound::pusher::signature::signed_query;
///
/// let query = signed_query("key", b"secret", "/apps/1/events", 1_700_000_000, b"{}")
///     .expect("signed");
/// assert!(query.starts_with("auth_key=key&auth_timestamp=1700000000&auth_version=1.0&body_md5="));
/// assert!(query.contains("&auth_signature="));
/// ```
pub fn signed_query(
    key: &str,
    secret: &[u8],
    path: &str,
    timestamp: i64,
    body: &[u8],
) -> Result<String, InvalidLength> {
    let mut params = BTreeMap::new();
    params.insert("auth_key", key.to_owned());
    params.insert("auth_timestamp", timestamp.to_string());
    params.insert("auth_version", AUTH_VERSION.to_owned());
    params.insert("body_md5", body_md5(body));
    let canonical = canonical_query(&params);
    let signature = sign(secret, "POST", path, &canonical)?;
    Ok(format!("{canonical}&auth_signature={signature}"))
}
