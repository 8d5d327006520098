// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation of individual DNS records against netcup-hosted zones.
//!
//! # Operations
//!
//! - [`DnsRecordReconciler::check`] - Normalize and validate inputs locally
//! - [`DnsRecordReconciler::create`] - Append a record and resolve its id
//! - [`DnsRecordReconciler::read`] - Refresh state, detecting out-of-band deletion
//! - [`DnsRecordReconciler::update`] - Modify a record in place
//! - [`DnsRecordReconciler::delete`] - Tombstone a record
//! - [`DnsRecordReconciler::diff`] - Classify changes as in-place or replacing
//!
//! # Example
//!
//! ```rust,no_run
//! use netcup_dns::config::ProviderConfig;
//! use netcup_dns::reconcilers::DnsRecordReconciler;
//! use netcup_dns::record::DesiredRecord;
//!
//! async fn publish(config: &ProviderConfig) -> anyhow::Result<String> {
//!     let reconciler = DnsRecordReconciler::from_config(config)?;
//!     let desired = DesiredRecord::new("example.com", "www", "A", "192.0.2.10");
//!
//!     let created = reconciler.create(desired, false).await?;
//!     Ok(created.id)
//! }
//! ```

pub mod diff;
pub mod dns_record;

pub use diff::{DiffKind, DiffResponse, PropertyDiff};
pub use dns_record::{
    CheckResponse, CreateResponse, DeleteOutcome, DnsRecordReconciler, ReadResponse,
};
