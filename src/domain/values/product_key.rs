//! Canonical cross-source product identity derived from a listing URL.
//!
//! Platform-specific canonicalization strips tracking noise and extracts
//! the platform's catalog id (Amazon ASIN, Flipkart item id, Myntra style
//! id). When no clean id is extractable the key falls back to the
//! normalized `host/path`, which is deterministic but not authoritative:
//! only catalog keys are treated as definite identity by the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductKey {
    value: String,
    is_catalog: bool,
}

impl ProductKey {
    /// Derive the key from a product URL. Deterministic: tracking
    /// parameters and URL casing never change the result.
    ///
    /// Errors only on blank input, which is a caller contract violation;
    /// any non-blank URL yields at least a fallback key.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("Product URL must not be blank".to_string());
        }

        let (host, path, query) = split_url(trimmed);

        if host.contains("amazon") {
            if let Some(asin) = extract_amazon_asin(&path) {
                return Ok(Self::catalog("amazon", &asin));
            }
        } else if host.contains("flipkart") {
            if let Some(pid) = extract_flipkart_id(&path, &query) {
                return Ok(Self::catalog("flipkart", &pid));
            }
        } else if host.contains("myntra") {
            if let Some(style) = extract_myntra_id(&path) {
                return Ok(Self::catalog("myntra", &style));
            }
        }

        let path = path.trim_end_matches('/').to_lowercase();
        Ok(Self {
            value: format!("{host}{path}"),
            is_catalog: false,
        })
    }

    /// Rehydrate a key previously produced by [`ProductKey::from_url`]
    /// (storage round-trips).
    pub fn from_parts(value: String, is_catalog: bool) -> Self {
        Self { value, is_catalog }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when the key carries a platform catalog id and is therefore
    /// definite product identity.
    pub fn is_catalog(&self) -> bool {
        self.is_catalog
    }

    fn catalog(platform: &str, id: &str) -> Self {
        Self {
            value: format!("{platform}:{id}"),
            is_catalog: true,
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Split a URL into (lowercased host without `www.`, path, query).
fn split_url(url: &str) -> (String, String, String) {
    let rest = match url.find("://") {
        Some(i) => &url[i + 3..],
        None => url,
    };
    let rest = rest.split('#').next().unwrap_or(rest);
    let (rest, query) = match rest.split_once('?') {
        Some((r, q)) => (r, q.to_string()),
        None => (rest, String::new()),
    };
    let (host, path) = match rest.find('/') {
        Some(i) => (&rest[..i], rest[i..].to_string()),
        None => (rest, String::new()),
    };
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    (host, path, query)
}

/// ASIN: ten alphanumeric chars after `/dp/` or `/gp/product/`.
fn extract_amazon_asin(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for (i, seg) in segments.iter().enumerate() {
        let is_marker = seg.eq_ignore_ascii_case("dp")
            || (seg.eq_ignore_ascii_case("gp")
                && segments
                    .get(i + 1)
                    .is_some_and(|s| s.eq_ignore_ascii_case("product")));
        if !is_marker {
            continue;
        }
        let id_idx = if seg.eq_ignore_ascii_case("dp") { i + 1 } else { i + 2 };
        if let Some(id) = segments.get(id_idx) {
            if id.len() == 10 && id.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Some(id.to_ascii_uppercase());
            }
        }
    }
    None
}

/// Flipkart item id: `/p/itm…` path segment, or a `pid=` query parameter.
fn extract_flipkart_id(path: &str, query: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    for (i, seg) in segments.iter().enumerate() {
        if seg.eq_ignore_ascii_case("p") {
            if let Some(id) = segments.get(i + 1) {
                let id = id.to_ascii_lowercase();
                if id.starts_with("itm")
                    && id.len() > 3
                    && id.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    return Some(id);
                }
            }
        }
    }
    for pair in query.split('&') {
        if let Some(pid) = pair.strip_prefix("pid=") {
            if !pid.is_empty() && pid.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Some(pid.to_ascii_lowercase());
            }
        }
    }
    None
}

/// Myntra style id: trailing all-digit path segment, with an optional
/// `/buy` suffix.
fn extract_myntra_id(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last().is_some_and(|s| s.eq_ignore_ascii_case("buy")) {
        segments.pop();
    }
    let last = segments.last()?;
    if last.chars().all(|c| c.is_ascii_digit()) {
        Some((*last).to_string())
    } else {
        None
    }
}
