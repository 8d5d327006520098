// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP implementation of [`DnsApi`] for the netcup CCP endpoint.

use super::types::{
    ApiRequest, ApiResponse, DnsRecordsPayload, InfoDnsRecordsParams, LoginParams,
    LoginResponseData, RemoteRecord, SessionParams, UpdateDnsRecordsParams,
};
use super::{DnsApi, Session};
use crate::config::ProviderConfig;
use crate::constants::{
    ACTION_INFO_DNS_RECORDS, ACTION_LOGIN, ACTION_LOGOUT, ACTION_UPDATE_DNS_RECORDS,
    API_TIMEOUT_SECS,
};
use crate::dns_errors::{AuthError, BackendError, DnsError, TransportError};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// Client for the netcup CCP JSON API.
///
/// Holds the credentials and a pooled HTTP client with a fixed absolute
/// timeout of [`API_TIMEOUT_SECS`]. Cloning is cheap.
#[derive(Clone)]
pub struct NetcupClient {
    http: HttpClient,
    endpoint: String,
    customer_id: String,
    api_key: String,
    api_password: String,
}

impl fmt::Debug for NetcupClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetcupClient")
            .field("endpoint", &self.endpoint)
            .field("customer_id", &self.customer_id)
            .finish_non_exhaustive()
    }
}

impl NetcupClient {
    /// Create a client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, DnsError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            customer_id: config.customer_id.clone(),
            api_key: config.api_key.clone(),
            api_password: config.api_password.clone(),
        })
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn session_params<'a>(&'a self, session: &'a Session) -> SessionParams<'a> {
        SessionParams {
            customer_number: &self.customer_id,
            api_key: &self.api_key,
            api_session_id: session.id(),
        }
    }

    /// Post one action and decode the response envelope.
    ///
    /// Does not look at the envelope's `status`; callers decide what a
    /// non-success status means for their action.
    async fn api_request<P: Serialize + fmt::Debug>(
        &self,
        action: &str,
        param: P,
    ) -> Result<ApiResponse, DnsError> {
        info!(
            action = %action,
            endpoint = %self.endpoint,
            "HTTP API request to netcup"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .json(&ApiRequest { action, param })
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                action = %action,
                endpoint = %self.endpoint,
                status = %status,
                error = %error_text,
                "HTTP API request failed"
            );
            return Err(TransportError::UnexpectedHttpResponse {
                endpoint: self.endpoint.clone(),
                status_code: status.as_u16(),
                reason: error_text,
            }
            .into());
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let api_response: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| DnsError::malformed(action, format!("invalid JSON envelope: {e}")))?;

        info!(
            action = %action,
            status = %api_response.status,
            status_code = api_response.status_code,
            server_request_id = %api_response.server_request_id,
            "HTTP API request completed"
        );
        crate::metrics::record_backend_request(action, &api_response.status);

        Ok(api_response)
    }

    fn transport_error(&self, err: &reqwest::Error) -> DnsError {
        crate::metrics::record_backend_request("transport", "error");
        if err.is_timeout() {
            TransportError::HttpRequestTimeout {
                endpoint: self.endpoint.clone(),
                timeout_secs: API_TIMEOUT_SECS,
            }
            .into()
        } else {
            TransportError::HttpConnectionFailed {
                endpoint: self.endpoint.clone(),
                reason: err.to_string(),
            }
            .into()
        }
    }
}

#[async_trait]
impl DnsApi for NetcupClient {
    async fn login(&self) -> Result<Session, DnsError> {
        let response = self
            .api_request(
                ACTION_LOGIN,
                LoginParams {
                    customer_number: &self.customer_id,
                    api_key: &self.api_key,
                    api_password: &self.api_password,
                },
            )
            .await?;

        if !response.is_success() {
            let err = AuthError::from_status(response.status_code, response.message());
            error!(status_code = response.status_code, error = %err, "Login rejected");
            return Err(err.into());
        }

        let data: LoginResponseData = serde_json::from_value(response.response_data)
            .map_err(|e| {
                DnsError::malformed(ACTION_LOGIN, format!("no session ID returned: {e}"))
            })?;

        debug!("Backend session opened");
        Ok(Session::new(data.api_session_id))
    }

    async fn logout(&self, session: &Session) -> Result<(), DnsError> {
        let response = self
            .api_request(ACTION_LOGOUT, self.session_params(session))
            .await?;

        if !response.is_success() {
            return Err(BackendError::from_status(
                ACTION_LOGOUT,
                response.status_code,
                response.message(),
            )
            .into());
        }

        debug!("Backend session closed");
        Ok(())
    }

    async fn info_dns_records(
        &self,
        session: &Session,
        domain: &str,
    ) -> Result<ApiResponse, DnsError> {
        self.api_request(
            ACTION_INFO_DNS_RECORDS,
            InfoDnsRecordsParams {
                domain_name: domain,
                session: self.session_params(session),
            },
        )
        .await
    }

    async fn update_dns_records(
        &self,
        session: &Session,
        domain: &str,
        records: &[RemoteRecord],
    ) -> Result<ApiResponse, DnsError> {
        self.api_request(
            ACTION_UPDATE_DNS_RECORDS,
            UpdateDnsRecordsParams {
                domain_name: domain,
                session: self.session_params(session),
                dns_record_set: DnsRecordsPayload {
                    dns_records: records,
                },
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
