// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Post-write record id discovery.
//!
//! `updateDnsRecords` does not report the id it assigned to a newly appended
//! record. Resolution is an explicit second phase: re-fetch the set and pick
//! the record whose hostname, type and destination (and priority, for
//! priority-bearing types) equal the submitted values.
//!
//! When several records match, which the backend permits, the first one in
//! the returned order wins.

use crate::api::{DnsApi, RemoteRecord, Session};
use crate::dns_errors::{DnsError, RecordError};
use crate::record::DesiredRecord;
use crate::record_set::{fetch_set, RecordSet};
use crate::record_type::requires_priority;
use tracing::{debug, warn};

/// Build the record to append for a desired record.
#[must_use]
pub fn to_remote(desired: &DesiredRecord) -> RemoteRecord {
    RemoteRecord {
        id: None,
        hostname: desired.name.clone(),
        record_type: desired.record_type.clone(),
        priority: desired.priority_str().to_string(),
        destination: desired.value.clone(),
        delete_record: false,
        state: None,
    }
}

/// Whether a stored record carries the desired hostname, type, destination
/// and, for priority-bearing types, priority.
#[must_use]
pub fn matches(remote: &RemoteRecord, desired: &DesiredRecord) -> bool {
    let same_identity = remote.hostname == desired.name
        && remote.record_type.eq_ignore_ascii_case(&desired.record_type)
        && remote.destination == desired.value;

    if !same_identity {
        return false;
    }

    !requires_priority(&desired.record_type) || remote.priority == desired.priority_str()
}

/// First record in `set` that matches `desired` and has an id.
#[must_use]
pub fn find_match<'a>(set: &'a RecordSet, desired: &DesiredRecord) -> Option<&'a RemoteRecord> {
    let mut candidates = set
        .iter()
        .filter(|r| r.id.is_some() && matches(r, desired));

    let first = candidates.next()?;
    let duplicates = candidates.count();
    if duplicates > 0 {
        warn!(
            hostname = %desired.name,
            record_type = %desired.record_type,
            duplicates = duplicates,
            "Multiple records match; using the first in backend order"
        );
    }
    Some(first)
}

/// Re-fetch the zone and resolve the id of a just-written record.
///
/// # Errors
///
/// Returns [`RecordError::UnresolvedRecordId`] if no record matches, which
/// usually means the backend has not yet made the write visible. Fetch errors
/// are propagated.
pub async fn resolve_record_id<A>(
    api: &A,
    session: &Session,
    desired: &DesiredRecord,
) -> Result<String, DnsError>
where
    A: DnsApi + ?Sized,
{
    let set = fetch_set(api, session, &desired.domain).await?;

    let record_id = find_match(&set, desired)
        .and_then(|r| r.id.clone())
        .ok_or_else(|| RecordError::UnresolvedRecordId {
            domain: desired.domain.clone(),
            hostname: desired.name.clone(),
            record_type: desired.record_type.clone(),
            destination: desired.value.clone(),
        })?;

    debug!(
        domain = %desired.domain,
        hostname = %desired.name,
        record_id = %record_id,
        "Resolved backend record id"
    );
    Ok(record_id)
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod matcher_tests;
