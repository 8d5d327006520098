// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Whole-zone record-set reads and writes.
//!
//! The backend has no per-record endpoints: every change is made by fetching
//! the complete record set of a zone, modifying it in memory and submitting
//! the complete set back.
//!
//! # Concurrency
//!
//! [`fetch_set`] followed by [`submit_set`] is an optimistic, last-writer-wins
//! read-modify-write. The backend offers no compare-and-swap, version token or
//! lock: if another writer changes the same zone between a caller's fetch and
//! submit, that change is silently lost. Callers must serialize operations per
//! domain, for example with [`crate::domain_lock::InProcessDomainLocks`].

use crate::api::types::DnsRecordsResponseData;
use crate::api::{ApiResponse, DnsApi, RemoteRecord, Session};
use crate::constants::{ACTION_INFO_DNS_RECORDS, ACTION_UPDATE_DNS_RECORDS};
use crate::dns_errors::{BackendError, DnsError};
use tracing::{debug, error, info};

/// The complete, unordered collection of records of one zone.
///
/// Order is preserved as returned by the backend so that first-match
/// lookups are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<RemoteRecord>,
}

impl RecordSet {
    #[must_use]
    pub fn new(records: Vec<RemoteRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[RemoteRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemoteRecord> {
        self.records.iter()
    }

    /// Append a record that has not been written yet.
    pub fn push(&mut self, record: RemoteRecord) {
        self.records.push(record);
    }

    /// The record with the given backend id, if present.
    #[must_use]
    pub fn find_by_id(&self, record_id: &str) -> Option<&RemoteRecord> {
        self.records
            .iter()
            .find(|r| r.id.as_deref() == Some(record_id))
    }

    /// Mutable access to the record with the given backend id.
    pub fn find_by_id_mut(&mut self, record_id: &str) -> Option<&mut RemoteRecord> {
        self.records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(record_id))
    }

    /// Mark the record with the given id for removal on the next submit.
    ///
    /// Returns `false` if no such record exists.
    pub fn tombstone(&mut self, record_id: &str) -> bool {
        match self.find_by_id_mut(record_id) {
            Some(record) => {
                record.delete_record = true;
                true
            }
            None => false,
        }
    }
}

impl IntoIterator for RecordSet {
    type Item = RemoteRecord;
    type IntoIter = std::vec::IntoIter<RemoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a RemoteRecord;
    type IntoIter = std::slice::Iter<'a, RemoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Fetch the complete record set of a zone.
///
/// # Errors
///
/// - [`BackendError`] if the backend does not report success
/// - [`DnsError::MalformedResponse`] if `responsedata.dnsrecords` is missing
///   or not a list of records
/// - transport errors from the underlying [`DnsApi`]
pub async fn fetch_set<A>(api: &A, session: &Session, domain: &str) -> Result<RecordSet, DnsError>
where
    A: DnsApi + ?Sized,
{
    let response = api.info_dns_records(session, domain).await?;
    ensure_success(ACTION_INFO_DNS_RECORDS, domain, &response)?;

    let set = parse_record_set(ACTION_INFO_DNS_RECORDS, response)?;
    debug!(domain = %domain, records = set.len(), "Fetched record set");
    Ok(set)
}

/// Replace the complete record set of a zone.
///
/// `set` must contain every record that should survive the write: existing
/// records, modified records, new records without an id, and tombstoned
/// records to remove.
///
/// # Errors
///
/// - [`BackendError`] classified by status code (invalid format, domain not
///   accessible, rate limited, generic)
/// - transport errors from the underlying [`DnsApi`]
pub async fn submit_set<A>(
    api: &A,
    session: &Session,
    domain: &str,
    set: &RecordSet,
) -> Result<(), DnsError>
where
    A: DnsApi + ?Sized,
{
    let tombstoned = set.iter().filter(|r| r.delete_record).count();
    let pending = set.iter().filter(|r| r.id.is_none()).count();
    info!(
        domain = %domain,
        records = set.len(),
        new_records = pending,
        deleted_records = tombstoned,
        "Submitting full record set"
    );

    let response = api.update_dns_records(session, domain, set.records()).await?;
    ensure_success(ACTION_UPDATE_DNS_RECORDS, domain, &response)?;

    debug!(domain = %domain, "Record set accepted");
    Ok(())
}

fn ensure_success(action: &str, domain: &str, response: &ApiResponse) -> Result<(), DnsError> {
    if response.is_success() {
        return Ok(());
    }

    let err = BackendError::from_status(action, response.status_code, response.message());
    error!(
        action = %action,
        domain = %domain,
        status_code = response.status_code,
        error = %err,
        "Backend rejected record-set call"
    );
    Err(err.into())
}

/// Decode `responsedata.dnsrecords` of a successful response.
///
/// # Errors
///
/// Returns [`DnsError::MalformedResponse`] if the payload does not have the
/// documented nested structure.
pub fn parse_record_set(action: &str, response: ApiResponse) -> Result<RecordSet, DnsError> {
    if !response.response_data.is_object() {
        return Err(DnsError::malformed(
            action,
            "responsedata is not an object",
        ));
    }

    let data: DnsRecordsResponseData = serde_json::from_value(response.response_data)
        .map_err(|e| DnsError::malformed(action, format!("invalid dnsrecords: {e}")))?;

    Ok(RecordSet::new(data.dns_records))
}

#[cfg(test)]
#[path = "record_set_tests.rs"]
mod record_set_tests;
