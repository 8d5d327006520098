// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests
//!
//! [`FakeCcp`] emulates the netcup CCP JSON endpoint behind a wiremock server:
//! it checks credentials and session ids, keeps per-zone record sets, assigns
//! ids to new records and honours the `deleterecord` tombstone.

#![allow(dead_code)]

use netcup_dns::config::ProviderConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const CUSTOMER_ID: &str = "12345";
pub const API_KEY: &str = "test-key";
pub const API_PASSWORD: &str = "test-password";
pub const SESSION_ID: &str = "test-session";

const ENDPOINT_PATH: &str = "/run/webservice/servers/endpoint.php";

#[derive(Default)]
struct CcpState {
    zones: HashMap<String, Vec<Value>>,
    next_id: u64,
    actions: Vec<String>,
    open_sessions: i64,
    update_status: Option<(i64, String)>,
}

/// Stateful emulation of the CCP endpoint.
#[derive(Clone, Default)]
pub struct FakeCcp {
    state: Arc<Mutex<CcpState>>,
}

impl FakeCcp {
    /// Seed a zone; records are given as backend JSON objects.
    pub fn seed(&self, domain: &str, records: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .zones
            .insert(domain.to_string(), records);
    }

    /// Make every following `updateDnsRecords` fail with the given status.
    pub fn fail_updates(&self, status_code: i64, message: &str) {
        self.state.lock().unwrap().update_status = Some((status_code, message.to_string()));
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn open_sessions(&self) -> i64 {
        self.state.lock().unwrap().open_sessions
    }

    pub fn records(&self, domain: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .zones
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }
}

fn envelope(
    action: &str,
    status: &str,
    status_code: i64,
    message: &str,
    data: Value,
) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "serverrequestid": "fake-server",
        "clientrequestid": "",
        "action": action,
        "status": status,
        "statuscode": status_code,
        "shortmessage": message,
        "longmessage": message,
        "responsedata": data
    }))
}

fn ok(action: &str, data: Value) -> ResponseTemplate {
    envelope(action, "success", 2000, "", data)
}

fn error(action: &str, status_code: i64, message: &str) -> ResponseTemplate {
    envelope(action, "error", status_code, message, json!(""))
}

impl Respond for FakeCcp {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400).set_body_string("invalid JSON");
        };
        let action = body["action"].as_str().unwrap_or_default().to_string();
        let param = &body["param"];

        let mut state = self.state.lock().unwrap();
        state.actions.push(action.clone());

        if param["customernumber"] != CUSTOMER_ID || param["apikey"] != API_KEY {
            return error(&action, 2011, "The login was not successful");
        }

        if action == "login" {
            if param["apipassword"] != API_PASSWORD {
                return error(&action, 2011, "The login was not successful");
            }
            state.open_sessions += 1;
            return ok(&action, json!({ "apisessionid": SESSION_ID }));
        }

        if param["apisessionid"] != SESSION_ID {
            return error(&action, 4001, "The session id is not in a valid format");
        }

        let domain = param["domainname"].as_str().unwrap_or_default().to_string();
        match action.as_str() {
            "logout" => {
                state.open_sessions -= 1;
                ok(&action, json!(""))
            }
            "infoDnsRecords" => match state.zones.get(&domain) {
                Some(records) => ok(&action, json!({ "dnsrecords": records })),
                None => error(&action, 2016, "Domain not found"),
            },
            "updateDnsRecords" => {
                if let Some((status_code, message)) = state.update_status.clone() {
                    return error(&action, status_code, &message);
                }
                if !state.zones.contains_key(&domain) {
                    return error(&action, 2016, "Domain not found");
                }
                let submitted = param["dnsrecordset"]["dnsrecords"]
                    .as_array()
                    .cloned()
                    .unwrap_or_default();

                let mut stored = Vec::new();
                for mut record in submitted {
                    if record["deleterecord"] == true {
                        continue;
                    }
                    if record.get("id").is_none() {
                        state.next_id += 1;
                        record["id"] = json!(format!("{}", 50_000 + state.next_id));
                    }
                    record["state"] = json!("yes");
                    stored.push(record);
                }
                state.zones.insert(domain, stored.clone());
                ok(&action, json!({ "dnsrecords": stored }))
            }
            _ => error(&action, 4001, "Unknown action"),
        }
    }
}

/// Start a mock CCP endpoint.
pub async fn start_ccp() -> (MockServer, FakeCcp) {
    let server = MockServer::start().await;
    let ccp = FakeCcp::default();

    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ccp.clone())
        .mount(&server)
        .await;

    (server, ccp)
}

/// Provider configuration pointing at the mock endpoint.
pub fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(API_KEY, API_PASSWORD, CUSTOMER_ID)
        .with_endpoint(format!("{}{ENDPOINT_PATH}?JSON", server.uri()))
}

/// A stored record as the backend returns it.
pub fn stored_record(id: &str, hostname: &str, record_type: &str, destination: &str) -> Value {
    json!({
        "id": id,
        "hostname": hostname,
        "type": record_type,
        "priority": "0",
        "destination": destination,
        "deleterecord": false,
        "state": "yes"
    })
}
