// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the netcup CCP JSON API.
//!
//! Every call is a POST of `{"action": ..., "param": {...}}`; credentials and
//! the session id travel inside `param`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest<'a, P: Serialize> {
    pub action: &'a str,
    pub param: P,
}

/// Response envelope returned by every action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "serverrequestid", default)]
    pub server_request_id: String,
    #[serde(rename = "clientrequestid", default)]
    pub client_request_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "statuscode", default)]
    pub status_code: i64,
    #[serde(rename = "shortmessage", default)]
    pub short_message: String,
    #[serde(rename = "longmessage", default)]
    pub long_message: String,
    /// Action-specific payload; an empty string on most failures
    #[serde(rename = "responsedata", default)]
    pub response_data: serde_json::Value,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == crate::constants::STATUS_SUCCESS
    }

    /// The most descriptive message the backend supplied.
    #[must_use]
    pub fn message(&self) -> &str {
        if self.long_message.is_empty() {
            &self.short_message
        } else {
            &self.long_message
        }
    }
}

/// `param` of the `login` action.
#[derive(Clone, Serialize)]
pub struct LoginParams<'a> {
    #[serde(rename = "customernumber")]
    pub customer_number: &'a str,
    #[serde(rename = "apikey")]
    pub api_key: &'a str,
    #[serde(rename = "apipassword")]
    pub api_password: &'a str,
}

/// Session credentials shared by every post-login action.
#[derive(Clone, Serialize)]
pub struct SessionParams<'a> {
    #[serde(rename = "customernumber")]
    pub customer_number: &'a str,
    #[serde(rename = "apikey")]
    pub api_key: &'a str,
    #[serde(rename = "apisessionid")]
    pub api_session_id: &'a str,
}

/// `param` of the `infoDnsRecords` action.
#[derive(Clone, Serialize)]
pub struct InfoDnsRecordsParams<'a> {
    #[serde(rename = "domainname")]
    pub domain_name: &'a str,
    #[serde(flatten)]
    pub session: SessionParams<'a>,
}

/// `param` of the `updateDnsRecords` action.
#[derive(Clone, Serialize)]
pub struct UpdateDnsRecordsParams<'a> {
    #[serde(rename = "domainname")]
    pub domain_name: &'a str,
    #[serde(flatten)]
    pub session: SessionParams<'a>,
    #[serde(rename = "dnsrecordset")]
    pub dns_record_set: DnsRecordsPayload<'a>,
}

/// The `dnsrecordset` object submitted with `updateDnsRecords`.
#[derive(Clone, Serialize)]
pub struct DnsRecordsPayload<'a> {
    #[serde(rename = "dnsrecords")]
    pub dns_records: &'a [RemoteRecord],
}

// Parameter structs carry the API key; keep them out of debug logs.
macro_rules! redacted_debug {
    ($($ty:ident),+) => {
        $(impl fmt::Debug for $ty<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($ty), " { <redacted> }"))
            }
        })+
    };
}

redacted_debug!(
    LoginParams,
    SessionParams,
    InfoDnsRecordsParams,
    UpdateDnsRecordsParams,
    DnsRecordsPayload
);

/// `responsedata` of `login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponseData {
    #[serde(rename = "apisessionid")]
    pub api_session_id: String,
}

/// `responsedata` of `infoDnsRecords` and `updateDnsRecords`.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsRecordsResponseData {
    #[serde(rename = "dnsrecords")]
    pub dns_records: Vec<RemoteRecord>,
}

/// One record of a zone's record set, as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Backend-assigned id; absent until the record has been written once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// `"0"` or empty for types without a priority
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: String,
    pub destination: String,
    /// Tombstone: the backend removes the record when the set is written.
    /// Write-only; never read back.
    #[serde(
        rename = "deleterecord",
        skip_deserializing,
        skip_serializing_if = "is_false"
    )]
    pub delete_record: bool,
    /// Record state marker returned by reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Signature required by serde
fn is_false(value: &bool) -> bool {
    !*value
}

/// The backend reports priorities as strings but numbers and null are accepted too.
fn deserialize_priority<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Priority {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Priority>::deserialize(deserializer)? {
        Some(Priority::Text(s)) => s,
        Some(Priority::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
