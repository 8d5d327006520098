// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Composite resource identifiers of the form `domain:recordID`.
//!
//! A backend record id is only unique within its zone, and every backend call
//! needs the zone name, so the domain travels with the id.

use crate::constants::COMPOSITE_ID_SEPARATOR;
use crate::dns_errors::IdentifierError;

/// Encode a domain and backend record id.
///
/// ```
/// use netcup_dns::composite_id::{decode, encode};
///
/// let id = encode("example.com", "123456");
/// assert_eq!(id, "example.com:123456");
/// assert_eq!(decode(&id).unwrap(), ("example.com".to_string(), "123456".to_string()));
/// ```
#[must_use]
pub fn encode(domain: &str, record_id: &str) -> String {
    format!("{domain}{COMPOSITE_ID_SEPARATOR}{record_id}")
}

/// Split a composite identifier into `(domain, record_id)`.
///
/// # Errors
///
/// Returns [`IdentifierError`] unless the string contains exactly one
/// separator with a non-empty part on each side.
pub fn decode(id: &str) -> Result<(String, String), IdentifierError> {
    let invalid = |reason: &str| IdentifierError {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    let mut parts = id.split(COMPOSITE_ID_SEPARATOR);
    let (Some(domain), Some(record_id), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected exactly one ':' separator"));
    };

    if domain.is_empty() {
        return Err(invalid("domain part is empty"));
    }
    if record_id.is_empty() {
        return Err(invalid("record id part is empty"));
    }

    Ok((domain.to_string(), record_id.to_string()))
}

#[cfg(test)]
#[path = "composite_id_tests.rs"]
mod composite_id_tests;
