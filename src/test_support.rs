// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`DnsApi`] used by unit tests.
//!
//! Zones are plain record lists. `updateDnsRecords` behaves like the real
//! backend: tombstoned records are dropped, records without an id get the
//! next free id, everything else is stored as submitted.

use crate::api::{ApiResponse, DnsApi, RemoteRecord, Session};
use crate::constants::STATUS_SUCCESS;
use crate::dns_errors::{AuthError, DnsError, TransportError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// A non-success envelope returned instead of performing an action.
#[derive(Clone, Debug)]
pub struct Rejection {
    pub status_code: i64,
    pub message: String,
}

impl Rejection {
    pub fn new(status_code: i64, message: &str) -> Self {
        Self {
            status_code,
            message: message.to_string(),
        }
    }

    fn response(&self, action: &str) -> ApiResponse {
        ApiResponse {
            action: action.to_string(),
            status: "error".to_string(),
            status_code: self.status_code,
            long_message: self.message.clone(),
            response_data: json!(""),
            ..ApiResponse::default()
        }
    }
}

#[derive(Default)]
struct FakeState {
    zones: HashMap<String, Vec<RemoteRecord>>,
    next_id: u64,
    calls: Vec<String>,
    open_sessions: usize,
    login_error: Option<AuthError>,
    logout_error: bool,
    info_rejection: Option<Rejection>,
    update_rejection: Option<Rejection>,
    update_transport_error: bool,
    hide_writes: bool,
    submitted: Vec<Vec<RemoteRecord>>,
}

/// In-memory netcup backend.
#[derive(Default)]
pub struct FakeDnsApi {
    state: Mutex<FakeState>,
}

impl FakeDnsApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..FakeState::default()
            }),
        }
    }

    /// Seed a zone with existing records.
    pub fn with_zone(self, domain: &str, records: Vec<RemoteRecord>) -> Self {
        self.state
            .lock()
            .unwrap()
            .zones
            .insert(domain.to_string(), records);
        self
    }

    pub fn fail_login(self, err: AuthError) -> Self {
        self.state.lock().unwrap().login_error = Some(err);
        self
    }

    pub fn fail_logout(self) -> Self {
        self.state.lock().unwrap().logout_error = true;
        self
    }

    pub fn reject_info(self, rejection: Rejection) -> Self {
        self.state.lock().unwrap().info_rejection = Some(rejection);
        self
    }

    pub fn reject_update(self, rejection: Rejection) -> Self {
        self.state.lock().unwrap().update_rejection = Some(rejection);
        self
    }

    pub fn fail_update_transport(self) -> Self {
        self.state.lock().unwrap().update_transport_error = true;
        self
    }

    /// Accept writes but never make them visible to reads.
    pub fn hide_writes(self) -> Self {
        self.state.lock().unwrap().hide_writes = true;
        self
    }

    /// Every backend action invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, action: &str) -> usize {
        self.calls().iter().filter(|c| *c == action).count()
    }

    /// Sessions opened and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.state.lock().unwrap().open_sessions
    }

    /// Current records of a zone.
    pub fn records(&self, domain: &str) -> Vec<RemoteRecord> {
        self.state
            .lock()
            .unwrap()
            .zones
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    /// Record lists passed to `updateDnsRecords`, in order.
    pub fn submitted(&self) -> Vec<Vec<RemoteRecord>> {
        self.state.lock().unwrap().submitted.clone()
    }
}

fn success(action: &str, data: serde_json::Value) -> ApiResponse {
    ApiResponse {
        action: action.to_string(),
        status: STATUS_SUCCESS.to_string(),
        status_code: 2000,
        response_data: data,
        ..ApiResponse::default()
    }
}

#[async_trait]
impl DnsApi for FakeDnsApi {
    async fn login(&self) -> Result<Session, DnsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("login".to_string());
        if let Some(err) = state.login_error.clone() {
            return Err(err.into());
        }
        state.open_sessions += 1;
        Ok(Session::new("fake-session"))
    }

    async fn logout(&self, _session: &Session) -> Result<(), DnsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("logout".to_string());
        state.open_sessions = state.open_sessions.saturating_sub(1);
        if state.logout_error {
            return Err(TransportError::HttpConnectionFailed {
                endpoint: "fake".to_string(),
                reason: "connection reset".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn info_dns_records(
        &self,
        _session: &Session,
        domain: &str,
    ) -> Result<ApiResponse, DnsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("infoDnsRecords".to_string());
        if let Some(rejection) = &state.info_rejection {
            return Ok(rejection.response("infoDnsRecords"));
        }
        let records = state.zones.get(domain).cloned().unwrap_or_default();
        Ok(success(
            "infoDnsRecords",
            json!({ "dnsrecords": records }),
        ))
    }

    async fn update_dns_records(
        &self,
        _session: &Session,
        domain: &str,
        records: &[RemoteRecord],
    ) -> Result<ApiResponse, DnsError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("updateDnsRecords".to_string());
        state.submitted.push(records.to_vec());
        if state.update_transport_error {
            return Err(TransportError::HttpRequestTimeout {
                endpoint: "fake".to_string(),
                timeout_secs: 30,
            }
            .into());
        }
        if let Some(rejection) = &state.update_rejection {
            return Ok(rejection.response("updateDnsRecords"));
        }
        if state.hide_writes {
            return Ok(success("updateDnsRecords", json!({ "dnsrecords": [] })));
        }

        let mut stored = Vec::with_capacity(records.len());
        for record in records.iter().filter(|r| !r.delete_record) {
            let mut record = record.clone();
            if record.id.is_none() {
                state.next_id += 1;
                record.id = Some(state.next_id.to_string());
            }
            stored.push(record);
        }
        state.zones.insert(domain.to_string(), stored.clone());
        Ok(success(
            "updateDnsRecords",
            json!({ "dnsrecords": stored }),
        ))
    }
}

/// A stored record with an id.
pub fn remote(id: &str, hostname: &str, record_type: &str, destination: &str) -> RemoteRecord {
    RemoteRecord {
        id: Some(id.to_string()),
        hostname: hostname.to_string(),
        record_type: record_type.to_string(),
        priority: "0".to_string(),
        destination: destination.to_string(),
        delete_record: false,
        state: Some("yes".to_string()),
    }
}
