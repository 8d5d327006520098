// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-versus-stored comparison.
//!
//! Diffing is pure: it never contacts the backend. A change of `domain`,
//! `name` or `type` cannot be applied in place because it changes the
//! record's identity; those properties are reported as
//! [`DiffKind::UpdateReplace`] and request delete-before-replace so the old
//! record is removed before its replacement is created.

use crate::record::{DesiredRecord, ReconciledState};
use crate::record_type::requires_priority;
use serde::Serialize;
use std::collections::BTreeMap;

/// How a property change must be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffKind {
    /// The record can be modified in place
    Update,
    /// The record must be deleted and re-created
    UpdateReplace,
}

/// A single changed property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDiff {
    pub kind: DiffKind,
    /// False for derived outputs that only changed as a consequence of inputs
    pub input_diff: bool,
}

impl PropertyDiff {
    const fn input(kind: DiffKind) -> Self {
        Self {
            kind,
            input_diff: true,
        }
    }
}

/// Result of comparing desired inputs with stored state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResponse {
    /// True if any input property differs
    pub has_changes: bool,
    /// True if the old record must be deleted before its replacement is created
    pub delete_before_replace: bool,
    /// Per-property changes keyed by property name
    pub detailed_diff: BTreeMap<String, PropertyDiff>,
}

impl DiffResponse {
    /// True if any property requires replacement.
    #[must_use]
    pub fn requires_replace(&self) -> bool {
        self.detailed_diff
            .values()
            .any(|d| d.kind == DiffKind::UpdateReplace)
    }

    fn replace(&mut self, property: &str) {
        self.has_changes = true;
        self.delete_before_replace = true;
        self.detailed_diff
            .insert(property.to_string(), PropertyDiff::input(DiffKind::UpdateReplace));
    }

    fn update(&mut self, property: &str) {
        self.has_changes = true;
        self.detailed_diff
            .insert(property.to_string(), PropertyDiff::input(DiffKind::Update));
    }
}

/// Compare desired inputs against stored state.
///
/// Inputs are compared as given; callers pass normalized records.
#[must_use]
pub fn diff(desired: &DesiredRecord, state: &ReconciledState) -> DiffResponse {
    let stored = &state.record;
    let mut response = DiffResponse::default();

    if desired.domain != stored.domain {
        response.replace("domain");
    }
    if desired.name != stored.name {
        response.replace("name");
    }
    if desired.record_type != stored.record_type {
        response.replace("type");
    }
    if desired.value != stored.value {
        response.update("value");
    }
    if priority_changed(
        desired.priority.as_deref(),
        stored.priority.as_deref(),
        &desired.record_type,
    ) {
        response.update("priority");
    }

    if state.fqdn != desired.fqdn() {
        response.detailed_diff.insert(
            "fqdn".to_string(),
            PropertyDiff {
                kind: DiffKind::Update,
                input_diff: false,
            },
        );
    }

    response
}

/// Whether two priorities differ for a record of the given type.
///
/// For types that carry a priority the values are compared literally. For
/// all other types the backend reports `0` for an unset priority, so absent,
/// empty and `0` are equivalent.
#[must_use]
pub fn priority_changed(desired: Option<&str>, stored: Option<&str>, record_type: &str) -> bool {
    let desired = desired.unwrap_or_default();
    let stored = stored.unwrap_or_default();

    if requires_priority(record_type) {
        return desired != stored;
    }

    let unset = |p: &str| p.is_empty() || p == "0";
    if unset(desired) && unset(stored) {
        return false;
    }
    desired != stored
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
