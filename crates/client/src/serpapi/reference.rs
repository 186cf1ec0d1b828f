//! Detail reference resolution.
//!
//! Search results carry a ready-made detail URL (`serpapi_product_api`).
//! Before following it the URL is pinned to the configured API host and the
//! API key is attached, so the detail endpoint cannot be used to reach
//! arbitrary hosts.

use url::Url;

use super::ShoppingError;

/// Turn a detail reference into the URL to request.
///
/// Normalization steps:
/// 1. Trim whitespace; reject empty references
/// 2. Resolve relative references against `base`
/// 3. Require http(s) and the same host and port as `base`
/// 4. Drop the fragment
/// 5. Replace any `api_key` query parameter with `api_key`
pub fn resolve_reference(base: &Url, reference: &str, api_key: &str) -> Result<Url, ShoppingError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(ShoppingError::InvalidReference("empty reference".to_string()));
    }

    let mut url = base.join(trimmed).map_err(|e| ShoppingError::InvalidReference(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(ShoppingError::InvalidReference(format!("unsupported scheme: {scheme}"))),
    }

    let same_host = url.host_str().map(str::to_ascii_lowercase) == base.host_str().map(str::to_ascii_lowercase);
    if !same_host || url.port_or_known_default() != base.port_or_known_default() {
        return Err(ShoppingError::ForeignHost(url.host_str().unwrap_or_default().to_string()));
    }

    url.set_fragment(None);

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "api_key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("api_key", api_key);

    Ok(url)
}
