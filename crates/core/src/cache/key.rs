//! Cache key derivation.
//!
//! Keys depend only on product identity, never on the session or query, so
//! every selection of the same product lands on the same entry and distinct
//! products never share one.

use crate::Error;

/// Namespace prefix for product entries.
pub const KEY_PREFIX: &str = "product:";

const MAX_PRODUCT_ID_LEN: usize = 256;

/// Cache key for a product id.
pub fn product_key(product_id: &str) -> String {
    format!("{KEY_PREFIX}{}", product_id.trim())
}

/// Reject ids that cannot identify a cache entry or a page address.
///
/// Ids are limited to URL-unreserved ASCII so `/product/<id>` needs no escaping.
pub fn validate_product_id(product_id: &str) -> Result<(), Error> {
    let id = product_id.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("product id cannot be empty".into()));
    }
    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(Error::InvalidInput(format!(
            "product id too long: {} chars (max {MAX_PRODUCT_ID_LEN})",
            id.len()
        )));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')) {
        return Err(Error::InvalidInput("product id contains invalid characters".into()));
    }
    Ok(())
}
