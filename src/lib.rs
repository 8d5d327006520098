// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # netcup-dns - DNS record reconciliation for netcup-hosted zones
//!
//! The netcup CCP API has no per-record endpoints: a zone's records can only
//! be read as a whole and written as a whole. This library turns that
//! coarse-grained surface into fine-grained create, read, update and delete
//! operations on individual records, suitable for a declarative
//! infrastructure tool that persists state between runs.
//!
//! ## Modules
//!
//! - [`reconcilers`] - Record lifecycle operations and diffing
//! - [`record`] - Desired and reconciled record state, normalization, validation
//! - [`record_type`] - Supported record types and their rules
//! - [`record_set`] - Whole-zone fetch and submit
//! - [`matcher`] - Post-write record id resolution
//! - [`composite_id`] - `domain:recordID` identifiers
//! - [`api`] - Sessions and the HTTP client for the CCP API
//! - [`domain_lock`] - Per-domain serialization of read-modify-write cycles
//! - [`config`] - Provider credentials and endpoint
//! - [`dns_errors`] - Error types
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use netcup_dns::config::ProviderConfig;
//! use netcup_dns::reconcilers::DnsRecordReconciler;
//! use netcup_dns::record::DesiredRecord;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ProviderConfig::from_env()?;
//! let reconciler = DnsRecordReconciler::from_config(&config)?;
//!
//! let desired = DesiredRecord::new("example.com", "mail", "MX", "mx1.example.com")
//!     .with_priority("10");
//! let created = reconciler.create(desired, false).await?;
//!
//! if reconciler.read(&created.id).await?.is_none() {
//!     println!("record was removed out of band");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Writes are last-writer-wins at zone granularity. See [`record_set`] and
//! [`domain_lock`].

pub mod api;
pub mod composite_id;
pub mod config;
pub mod constants;
pub mod dns_errors;
pub mod domain_lock;
pub mod matcher;
pub mod metrics;
pub mod reconcilers;
pub mod record;
pub mod record_set;
pub mod record_type;

#[cfg(test)]
pub(crate) mod test_support;
