// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Session-scoped access to the netcup CCP API.
//!
//! The backend has a single JSON endpoint and four actions relevant here:
//!
//! - `login` opens a session and returns its id
//! - `logout` closes it
//! - `infoDnsRecords` returns the complete record set of a zone
//! - `updateDnsRecords` replaces the complete record set of a zone
//!
//! [`DnsApi`] is the seam between the record-set logic and the transport.
//! [`NetcupClient`] implements it over HTTPS; tests substitute in-memory
//! implementations.
//!
//! # Example
//!
//! ```rust,no_run
//! use netcup_dns::api::{with_session, NetcupClient};
//! use netcup_dns::config::ProviderConfig;
//! use netcup_dns::record_set::fetch_set;
//!
//! # async fn example() -> Result<(), netcup_dns::dns_errors::DnsError> {
//! let client = NetcupClient::new(&ProviderConfig::from_env().unwrap())?;
//! let set = with_session(&client, async |session| {
//!     fetch_set(&client, session, "example.com").await
//! })
//! .await?;
//! println!("{} records", set.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod session;
pub mod types;

pub use client::NetcupClient;
pub use session::with_session;
pub use types::{ApiResponse, RemoteRecord};

use crate::dns_errors::DnsError;
use async_trait::async_trait;
use std::fmt;

/// An open backend session.
///
/// The id is a bearer credential and is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session { id: <redacted> }")
    }
}

/// Raw access to the backend actions.
///
/// `login` classifies its own failures into [`crate::dns_errors::AuthError`].
/// The record-set actions return the response envelope as-is, successful or
/// not; interpreting it is the job of [`crate::record_set`]. Transport
/// failures and unparseable envelopes are returned as errors by every method.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Open a session.
    async fn login(&self) -> Result<Session, DnsError>;

    /// Close a session.
    async fn logout(&self, session: &Session) -> Result<(), DnsError>;

    /// Issue `infoDnsRecords` for a zone.
    async fn info_dns_records(
        &self,
        session: &Session,
        domain: &str,
    ) -> Result<ApiResponse, DnsError>;

    /// Issue `updateDnsRecords` for a zone with the complete record list.
    async fn update_dns_records(
        &self,
        session: &Session,
        domain: &str,
        records: &[RemoteRecord],
    ) -> Result<ApiResponse, DnsError>;
}
