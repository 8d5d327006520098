// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record reconciliation.
//!
//! [`DnsRecordReconciler`] drives the lifecycle of a single logical record
//! inside a zone whose only write primitive is "replace the whole record
//! set". Every backend-touching operation runs inside its own session and
//! performs at most one fetch-modify-submit cycle, guarded by the configured
//! [`DomainLock`].
//!
//! Nothing is retried internally. Errors carry the operation, domain and
//! record they belong to, and [`DnsError::is_transient`] tells the caller
//! whether retrying later may help.

use crate::api::{with_session, DnsApi, NetcupClient, RemoteRecord};
use crate::composite_id;
use crate::config::ProviderConfig;
use crate::constants::PREVIEW_RECORD_ID;
use crate::dns_errors::{DnsError, RecordError, ValidationError};
use crate::domain_lock::{DomainLock, NoDomainLock};
use crate::matcher::{resolve_record_id, to_remote};
use crate::metrics;
use crate::record::{self, CheckFailure, DesiredRecord, ReconciledState};
use crate::record_set::{fetch_set, submit_set};
use crate::record_type::requires_priority;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::diff::{diff, DiffResponse};

/// Result of [`DnsRecordReconciler::check`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// Normalized inputs
    pub inputs: DesiredRecord,
    /// Every validation failure, empty if the inputs are valid
    pub failures: Vec<CheckFailure>,
}

impl CheckResponse {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of [`DnsRecordReconciler::create`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    /// Composite identifier `domain:recordID`
    pub id: String,
    /// State to persist
    pub state: ReconciledState,
}

/// Result of [`DnsRecordReconciler::read`] when the record exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    /// Composite identifier, unchanged
    pub id: String,
    /// Inputs reconstructed from the backend
    pub inputs: DesiredRecord,
    /// State reconstructed from the backend
    pub state: ReconciledState,
}

/// Outcome of [`DnsRecordReconciler::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOutcome {
    /// The record was tombstoned and the set submitted
    Deleted,
    /// The record was already gone; nothing was written
    AlreadyAbsent,
}

/// Lifecycle operations for DNS records in netcup-hosted zones.
pub struct DnsRecordReconciler {
    api: Arc<dyn DnsApi>,
    domain_lock: Arc<dyn DomainLock>,
}

impl fmt::Debug for DnsRecordReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsRecordReconciler").finish_non_exhaustive()
    }
}

impl DnsRecordReconciler {
    /// Reconciler over an arbitrary backend, without per-domain locking.
    #[must_use]
    pub fn new(api: Arc<dyn DnsApi>) -> Self {
        Self {
            api,
            domain_lock: Arc::new(NoDomainLock),
        }
    }

    /// Reconciler talking to the netcup CCP API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, DnsError> {
        let client = NetcupClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Serialize fetch-modify-submit cycles through `lock`.
    #[must_use]
    pub fn with_domain_lock(mut self, lock: Arc<dyn DomainLock>) -> Self {
        self.domain_lock = lock;
        self
    }

    /// Normalize and validate raw inputs without contacting the backend.
    #[must_use]
    pub fn check(&self, raw: DesiredRecord) -> CheckResponse {
        let (inputs, failures) = record::check(raw);
        if !failures.is_empty() {
            debug!(
                domain = %inputs.domain,
                name = %inputs.name,
                failures = failures.len(),
                "Record inputs failed validation"
            );
        }
        CheckResponse { inputs, failures }
    }

    /// Create a record.
    ///
    /// Appends the record to the zone's record set, submits the set, then
    /// re-fetches it to learn the id the backend assigned. With `dry_run`,
    /// returns a placeholder id and makes no backend call at all.
    ///
    /// # Errors
    ///
    /// - [`DnsError::Validation`] for invalid inputs, before any backend call
    /// - [`RecordError::UnresolvedRecordId`] (transient) if the write succeeded
    ///   but the new record is not yet visible
    /// - authentication, backend and transport errors wrapped in
    ///   [`DnsError::Operation`]
    pub async fn create(
        &self,
        desired: DesiredRecord,
        dry_run: bool,
    ) -> Result<CreateResponse, DnsError> {
        let start = Instant::now();
        let result = self.create_record(desired, dry_run).await;
        observe("create", start, &result);
        result
    }

    async fn create_record(
        &self,
        desired: DesiredRecord,
        dry_run: bool,
    ) -> Result<CreateResponse, DnsError> {
        let desired = validated(desired)?;

        if dry_run {
            info!(
                domain = %desired.domain,
                name = %desired.name,
                record_type = %desired.record_type,
                "Dry run: skipping record creation"
            );
            return Ok(CreateResponse {
                id: composite_id::encode(&desired.domain, PREVIEW_RECORD_ID),
                state: ReconciledState::new(desired, PREVIEW_RECORD_ID),
            });
        }

        info!(
            domain = %desired.domain,
            name = %desired.name,
            record_type = %desired.record_type,
            "Creating DNS record"
        );

        let label = format!("{}/{}", desired.name, desired.record_type);
        let api = self.api.as_ref();
        let record_id = {
            let _guard = self.domain_lock.acquire(&desired.domain).await;
            with_session(api, async |session| {
                let mut set = fetch_set(api, session, &desired.domain).await?;
                set.push(to_remote(&desired));
                submit_set(api, session, &desired.domain, &set).await?;
                resolve_record_id(api, session, &desired).await
            })
            .await
            .map_err(|e| e.in_operation("create", &desired.domain, &label))?
        };

        let state = ReconciledState::new(desired, record_id);
        let id = state.composite_id();
        info!(id = %id, fqdn = %state.fqdn, "Created DNS record");
        Ok(CreateResponse { id, state })
    }

    /// Read the current state of a record from the backend.
    ///
    /// Returns `Ok(None)` if the record no longer exists, so the caller can
    /// drop it from its own state.
    ///
    /// # Errors
    ///
    /// - [`DnsError::InvalidIdentifier`] for a malformed composite id
    /// - authentication, backend and transport errors wrapped in
    ///   [`DnsError::Operation`]
    pub async fn read(&self, id: &str) -> Result<Option<ReadResponse>, DnsError> {
        let start = Instant::now();
        let result = self.read_record(id).await;
        observe("read", start, &result);
        result
    }

    async fn read_record(&self, id: &str) -> Result<Option<ReadResponse>, DnsError> {
        let (domain, record_id) = composite_id::decode(id)?;
        let api = self.api.as_ref();

        let found = with_session(api, async |session| {
            let set = fetch_set(api, session, &domain).await?;
            Ok::<_, DnsError>(set.find_by_id(&record_id).cloned())
        })
        .await
        .map_err(|e| e.in_operation("read", &domain, &record_id))?;

        let Some(remote) = found else {
            info!(domain = %domain, record_id = %record_id, "DNS record no longer exists");
            return Ok(None);
        };

        let inputs = desired_from_remote(domain, remote);
        let state = ReconciledState::new(inputs.clone(), record_id);
        Ok(Some(ReadResponse {
            id: id.to_string(),
            inputs,
            state,
        }))
    }

    /// Modify a record in place.
    ///
    /// Only changes that keep the record's identity are applied here; a
    /// changed domain must go through delete-then-create. With `dry_run`,
    /// returns the projected state without any backend call.
    ///
    /// # Errors
    ///
    /// - [`DnsError::Validation`] for invalid inputs or a changed domain
    /// - [`DnsError::InvalidIdentifier`] for a malformed composite id
    /// - [`RecordError::RecordNotFound`] if the record no longer exists
    /// - authentication, backend and transport errors
    ///
    /// Every error except validation and identifier errors is wrapped in
    /// [`DnsError::Operation`].
    pub async fn update(
        &self,
        id: &str,
        desired: DesiredRecord,
        dry_run: bool,
    ) -> Result<ReconciledState, DnsError> {
        let start = Instant::now();
        let result = self.update_record(id, desired, dry_run).await;
        observe("update", start, &result);
        result
    }

    async fn update_record(
        &self,
        id: &str,
        desired: DesiredRecord,
        dry_run: bool,
    ) -> Result<ReconciledState, DnsError> {
        let desired = validated(desired)?;
        let (domain, record_id) = composite_id::decode(id)?;

        if desired.domain != domain {
            return Err(ValidationError {
                failures: vec![CheckFailure::new(
                    "domain",
                    format!(
                        "record belongs to domain '{domain}'; a domain change requires replacement"
                    ),
                )],
            }
            .into());
        }

        if dry_run {
            info!(id = %id, "Dry run: skipping record update");
            return Ok(ReconciledState::new(desired, record_id));
        }

        info!(
            domain = %domain,
            record_id = %record_id,
            name = %desired.name,
            record_type = %desired.record_type,
            "Updating DNS record"
        );

        let api = self.api.as_ref();
        {
            let _guard = self.domain_lock.acquire(&domain).await;
            with_session(api, async |session| {
                let mut set = fetch_set(api, session, &domain).await?;
                let Some(remote) = set.find_by_id_mut(&record_id) else {
                    return Err(RecordError::RecordNotFound {
                        domain: domain.clone(),
                        record_id: record_id.clone(),
                    }
                    .into());
                };
                apply_desired(remote, &desired);
                submit_set(api, session, &domain, &set).await
            })
            .await
            .map_err(|e| {
                error!(id = %id, error = %e, "Failed to update DNS record");
                e.in_operation("update", &domain, &record_id)
            })?;
        }

        let state = ReconciledState::new(desired, record_id);
        info!(id = %id, fqdn = %state.fqdn, "Updated DNS record");
        Ok(state)
    }

    /// Remove a record.
    ///
    /// Deleting a record that no longer exists succeeds without writing.
    ///
    /// # Errors
    ///
    /// - [`DnsError::InvalidIdentifier`] for a malformed composite id
    /// - authentication, backend and transport errors wrapped in
    ///   [`DnsError::Operation`]
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, DnsError> {
        let start = Instant::now();
        let result = self.delete_record(id).await;
        observe("delete", start, &result);
        result
    }

    async fn delete_record(&self, id: &str) -> Result<DeleteOutcome, DnsError> {
        let (domain, record_id) = composite_id::decode(id)?;
        info!(domain = %domain, record_id = %record_id, "Deleting DNS record");

        let api = self.api.as_ref();
        let _guard = self.domain_lock.acquire(&domain).await;
        let outcome = with_session(api, async |session| {
            let mut set = fetch_set(api, session, &domain).await?;
            if !set.tombstone(&record_id) {
                return Ok::<_, DnsError>(DeleteOutcome::AlreadyAbsent);
            }
            submit_set(api, session, &domain, &set).await?;
            Ok(DeleteOutcome::Deleted)
        })
        .await
        .map_err(|e| e.in_operation("delete", &domain, &record_id))?;

        match outcome {
            DeleteOutcome::Deleted => info!(id = %id, "Deleted DNS record"),
            DeleteOutcome::AlreadyAbsent => {
                info!(id = %id, "DNS record already absent, nothing to delete");
            }
        }
        Ok(outcome)
    }

    /// Compare desired inputs against stored state without contacting the
    /// backend.
    #[must_use]
    pub fn diff(&self, desired: &DesiredRecord, state: &ReconciledState) -> DiffResponse {
        let response = diff(desired, state);
        debug!(
            has_changes = response.has_changes,
            delete_before_replace = response.delete_before_replace,
            properties = ?response.detailed_diff.keys().collect::<Vec<_>>(),
            "Computed record diff"
        );
        response
    }
}

/// Normalize and validate, failing on the first invalid input set.
fn validated(raw: DesiredRecord) -> Result<DesiredRecord, DnsError> {
    let (record, failures) = record::check(raw);
    if failures.is_empty() {
        Ok(record)
    } else {
        Err(ValidationError { failures }.into())
    }
}

/// Overwrite the mutable fields of a stored record, keeping its id.
fn apply_desired(remote: &mut RemoteRecord, desired: &DesiredRecord) {
    // An unset priority keeps the backend's own "unset" marker ("" or "0").
    let keep_stored = desired.priority.is_none()
        && !requires_priority(&desired.record_type)
        && matches!(remote.priority.as_str(), "" | "0");
    if !keep_stored {
        remote.priority = desired.priority_str().to_string();
    }
    remote.hostname.clone_from(&desired.name);
    remote.record_type.clone_from(&desired.record_type);
    remote.destination.clone_from(&desired.value);
    remote.delete_record = false;
}

/// Reconstruct desired inputs from a stored record.
///
/// The backend reports `0` for records without a priority, which is mapped
/// back to "unset". A `0` on a priority-bearing type is a real priority.
fn desired_from_remote(domain: String, remote: RemoteRecord) -> DesiredRecord {
    let priority = match remote.priority.as_str() {
        "" => None,
        "0" if !requires_priority(&remote.record_type) => None,
        _ => Some(remote.priority),
    };
    DesiredRecord {
        domain,
        name: remote.hostname,
        record_type: remote.record_type,
        value: remote.destination,
        priority,
    }
}

fn observe<T>(operation: &'static str, start: Instant, result: &Result<T, DnsError>) {
    let duration = start.elapsed();
    match result {
        Ok(_) => metrics::record_operation_success(operation, duration),
        Err(e) => metrics::record_operation_error(operation, e.status_reason(), duration),
    }
}

#[cfg(test)]
#[path = "dns_record_tests.rs"]
mod dns_record_tests;
