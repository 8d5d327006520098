// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired and reconciled record state, normalization and validation.
//!
//! A [`DesiredRecord`] is the caller's intent and is supplied fresh on every
//! reconciler call. A [`ReconciledState`] is what the caller persists between
//! runs: the desired fields plus the backend record id and the derived FQDN.

use crate::composite_id;
use crate::constants::{APEX_NAME, PREVIEW_RECORD_ID};
use crate::record_type::RecordType;
use serde::{Deserialize, Serialize};

/// The logical DNS record a caller wants to exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredRecord {
    /// Zone the record lives in (e.g. `example.com`)
    pub domain: String,
    /// Hostname relative to the zone, or `@` for the apex
    pub name: String,
    /// Record type, see [`RecordType`]
    #[serde(rename = "type")]
    pub record_type: String,
    /// Destination (IP address, target hostname, text, ...)
    pub value: String,
    /// Priority; required for MX and SRV, ignored otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl DesiredRecord {
    /// Convenience constructor for a record without priority.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            priority: None,
        }
    }

    /// Builder-style setter for the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// The priority as a plain string, empty when unset.
    #[must_use]
    pub fn priority_str(&self) -> &str {
        self.priority.as_deref().unwrap_or_default()
    }

    /// Fully qualified name this record resolves at.
    #[must_use]
    pub fn fqdn(&self) -> String {
        build_fqdn(&self.name, &self.domain)
    }
}

/// State persisted by the caller across reconciler invocations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledState {
    /// The desired fields as last applied
    #[serde(flatten)]
    pub record: DesiredRecord,
    /// Backend-assigned record id
    pub record_id: String,
    /// Derived fully qualified name
    pub fqdn: String,
}

impl ReconciledState {
    /// Build the state for a record id, deriving the FQDN.
    pub fn new(record: DesiredRecord, record_id: impl Into<String>) -> Self {
        let fqdn = record.fqdn();
        Self {
            record,
            record_id: record_id.into(),
            fqdn,
        }
    }

    /// The externally stable identity of this record.
    #[must_use]
    pub fn composite_id(&self) -> String {
        composite_id::encode(&self.record.domain, &self.record_id)
    }

    /// True for placeholder state produced by a dry run.
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.record_id == PREVIEW_RECORD_ID
    }
}

/// A single field-attributed validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Input property the failure belongs to
    pub property: String,
    /// Human-readable reason
    pub reason: String,
}

impl CheckFailure {
    pub fn new(property: &str, reason: impl Into<String>) -> Self {
        Self {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

/// Build the fully qualified domain name for a record.
///
/// # Examples
///
/// ```
/// use netcup_dns::record::build_fqdn;
///
/// assert_eq!(build_fqdn("@", "example.com"), "example.com");
/// assert_eq!(build_fqdn("", "example.com"), "example.com");
/// assert_eq!(build_fqdn("www", "example.com"), "www.example.com");
/// ```
#[must_use]
pub fn build_fqdn(name: &str, domain: &str) -> String {
    if name == APEX_NAME || name.is_empty() {
        domain.to_string()
    } else {
        format!("{name}.{domain}")
    }
}

/// Normalize raw inputs.
///
/// Upper-cases the type, lower-cases the domain, trims every field and
/// defaults an empty name to the apex.
#[must_use]
pub fn normalize(mut record: DesiredRecord) -> DesiredRecord {
    record.record_type = record.record_type.trim().to_uppercase();
    record.domain = record.domain.trim().to_lowercase();
    record.name = sanitize_record_name(&record.name);
    record.value = record.value.trim().to_string();
    record.priority = record.priority.map(|p| p.trim().to_string());
    record
}

fn sanitize_record_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        APEX_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Normalize raw inputs, then validate the normalized record.
///
/// Returns the normalized record together with every failure found.
#[must_use]
pub fn check(raw: DesiredRecord) -> (DesiredRecord, Vec<CheckFailure>) {
    let record = normalize(raw);
    let failures = validate(&record);
    (record, failures)
}

/// Validate a record, returning one failure per violated field.
///
/// Validation never stops at the first failure.
#[must_use]
pub fn validate(record: &DesiredRecord) -> Vec<CheckFailure> {
    let mut failures = Vec::new();

    let record_type = match record.record_type.parse::<RecordType>() {
        Ok(t) => Some(t),
        Err(e) => {
            failures.push(CheckFailure::new("type", e.to_string()));
            None
        }
    };

    if record.domain.is_empty() {
        failures.push(CheckFailure::new("domain", "Domain is required"));
    } else if !is_valid_domain(&record.domain) {
        failures.push(CheckFailure::new("domain", "Domain format is invalid"));
    }

    if record.name.is_empty() {
        failures.push(CheckFailure::new("name", "Name is required"));
    }

    if record.value.is_empty() {
        failures.push(CheckFailure::new("value", "Value is required"));
    }

    if let Some(record_type) = record_type {
        if record_type.requires_priority() && record.priority_str().is_empty() {
            failures.push(CheckFailure::new(
                "priority",
                format!("Priority is required for {record_type} records"),
            ));
        }
        if !record_type.allows_apex() && record.name == APEX_NAME {
            failures.push(CheckFailure::new(
                "name",
                format!("{record_type} records cannot be created for the root domain (@)"),
            ));
        }
    }

    failures
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.contains(char::is_whitespace) && domain.contains('.')
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
