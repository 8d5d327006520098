// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for netcup DNS operations.
//!
//! This module provides specialized error types for:
//! - Local input validation (field-attributed, never retried)
//! - Session authentication failures, classified by backend status code
//! - Non-success backend responses for record-set reads and writes
//! - Responses whose shape does not match the documented structure
//! - Records missing from a fetched record set
//! - Composite identifiers that cannot be decoded
//! - HTTP transport failures
//!
//! All of them compose into [`DnsError`], which the reconciler returns. Errors
//! raised by backend round trips are wrapped in [`DnsError::Operation`] so the
//! caller sees which operation, domain and record failed.

use crate::constants::{
    STATUS_CODE_ACCOUNT_NOT_FOUND, STATUS_CODE_DOMAIN_NOT_ACCESSIBLE,
    STATUS_CODE_INVALID_CREDENTIALS, STATUS_CODE_INVALID_RECORD_FORMAT, STATUS_CODE_RATE_LIMITED,
};
use crate::record::CheckFailure;
use thiserror::Error;

/// One or more fields of a desired record failed validation.
///
/// Produced entirely locally; no backend call is ever made for an input that
/// fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {}", render_failures(.failures))]
pub struct ValidationError {
    /// One entry per violated field
    pub failures: Vec<CheckFailure>,
}

fn render_failures(failures: &[CheckFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.property, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned when opening a backend session fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Status code 2011
    #[error("login failed: Invalid API credentials (API key or password incorrect): {message}")]
    InvalidCredentials {
        /// Backend `longmessage`
        message: String,
    },

    /// Status code 2029
    #[error("login failed: Customer account not found (check customer ID): {message}")]
    AccountNotFound {
        /// Backend `longmessage`
        message: String,
    },

    /// Status code 2057
    #[error(
        "login failed: Rate limit exceeded (more than 180 requests per minute). Please wait and retry later: {message}"
    )]
    RateLimited {
        /// Backend `longmessage`
        message: String,
    },

    /// Any other non-success login status
    #[error("login failed: Unknown error (status code: {status_code}): {message}")]
    LoginFailed {
        /// Backend `statuscode`
        status_code: i64,
        /// Backend `longmessage`
        message: String,
    },
}

impl AuthError {
    /// Classify a failed login by its backend status code.
    #[must_use]
    pub fn from_status(status_code: i64, message: &str) -> Self {
        let message = message.to_string();
        match status_code {
            STATUS_CODE_INVALID_CREDENTIALS => Self::InvalidCredentials { message },
            STATUS_CODE_ACCOUNT_NOT_FOUND => Self::AccountNotFound { message },
            STATUS_CODE_RATE_LIMITED => Self::RateLimited { message },
            _ => Self::LoginFailed {
                status_code,
                message,
            },
        }
    }
}

/// Errors for record-set calls that completed but did not report success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Status code 4013
    #[error(
        "{action}: The DNS records are not in valid format. Check record type, hostname format, and destination value (status code: {status_code}): {message}"
    )]
    InvalidRecordFormat {
        /// Backend action that failed
        action: String,
        /// Backend `statuscode`
        status_code: i64,
        /// Backend `longmessage`
        message: String,
    },

    /// Status code 2016
    #[error(
        "{action}: Domain not found or not accessible with current credentials (status code: {status_code}): {message}"
    )]
    DomainNotAccessible {
        /// Backend action that failed
        action: String,
        /// Backend `statuscode`
        status_code: i64,
        /// Backend `longmessage`
        message: String,
    },

    /// Status code 2057
    #[error(
        "{action}: Rate limit exceeded. Please wait and retry later (status code: {status_code}): {message}"
    )]
    RateLimited {
        /// Backend action that failed
        action: String,
        /// Backend `statuscode`
        status_code: i64,
        /// Backend `longmessage`
        message: String,
    },

    /// Any other non-success status
    #[error("{action} failed (status code: {status_code}): {message}")]
    RequestFailed {
        /// Backend action that failed
        action: String,
        /// Backend `statuscode`
        status_code: i64,
        /// Backend `longmessage`
        message: String,
    },
}

impl BackendError {
    /// Classify a non-success record-set response by its backend status code.
    #[must_use]
    pub fn from_status(action: &str, status_code: i64, message: &str) -> Self {
        let action = action.to_string();
        let message = message.to_string();
        match status_code {
            STATUS_CODE_INVALID_RECORD_FORMAT => Self::InvalidRecordFormat {
                action,
                status_code,
                message,
            },
            STATUS_CODE_DOMAIN_NOT_ACCESSIBLE => Self::DomainNotAccessible {
                action,
                status_code,
                message,
            },
            STATUS_CODE_RATE_LIMITED => Self::RateLimited {
                action,
                status_code,
                message,
            },
            _ => Self::RequestFailed {
                action,
                status_code,
                message,
            },
        }
    }

    /// The backend status code carried by this error.
    #[must_use]
    pub fn status_code(&self) -> i64 {
        match self {
            Self::InvalidRecordFormat { status_code, .. }
            | Self::DomainNotAccessible { status_code, .. }
            | Self::RateLimited { status_code, .. }
            | Self::RequestFailed { status_code, .. } => *status_code,
        }
    }
}

/// Errors for records that are expected in a fetched record set but are missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A record id no longer exists in the domain's record set
    #[error("DNS record not found: '{record_id}' in domain '{domain}'")]
    RecordNotFound {
        /// Zone the record was expected in
        domain: String,
        /// Backend record id
        record_id: String,
    },

    /// The record just written could not be located when re-reading the set.
    ///
    /// Usually a backend consistency delay rather than a logic error.
    #[error(
        "DNS record not found after write: no '{record_type}' record '{hostname}' -> '{destination}' in domain '{domain}'"
    )]
    UnresolvedRecordId {
        /// Zone that was written
        domain: String,
        /// Submitted hostname
        hostname: String,
        /// Submitted record type
        record_type: String,
        /// Submitted destination
        destination: String,
    },
}

/// A composite identifier that cannot be split into domain and record id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("composite ID must be in format 'domain:recordID', got '{id}': {reason}")]
pub struct IdentifierError {
    /// The identifier as supplied
    pub id: String,
    /// Why it was rejected
    pub reason: String,
}

/// Errors raised before a backend response could be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was reset
    #[error("HTTP connection to {endpoint} failed: {reason}")]
    HttpConnectionFailed {
        /// Endpoint URL
        endpoint: String,
        /// Underlying error
        reason: String,
    },

    /// The absolute request timeout elapsed
    #[error("HTTP request to {endpoint} timed out after {timeout_secs}s")]
    HttpRequestTimeout {
        /// Endpoint URL
        endpoint: String,
        /// Configured timeout
        timeout_secs: u64,
    },

    /// The endpoint answered with a non-2xx HTTP status
    #[error("Unexpected HTTP response from {endpoint}: {status_code} {reason}")]
    UnexpectedHttpResponse {
        /// Endpoint URL
        endpoint: String,
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        reason: String,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Underlying error
        reason: String,
    },
}

/// Composite error type returned by every reconciler operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// Local validation failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session could not be opened
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Record-set call reported a non-success status
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Expected record missing from a fetched set
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Composite identifier could not be decoded
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// HTTP transport failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response did not have the expected shape
    #[error("malformed {action} response: {reason}")]
    MalformedResponse {
        /// Backend action whose response was malformed
        action: String,
        /// What was wrong with it
        reason: String,
    },

    /// A lower-level error annotated with the operation that raised it
    #[error("{operation} failed for domain '{domain}' (record {record}): {source}")]
    Operation {
        /// Reconciler operation (`create`, `read`, `update`, `delete`)
        operation: &'static str,
        /// Zone the operation targeted
        domain: String,
        /// Record id, or `hostname/type` when no id is assigned yet
        record: String,
        /// The underlying error
        #[source]
        source: Box<DnsError>,
    },
}

impl DnsError {
    /// Shorthand for a [`DnsError::MalformedResponse`].
    pub fn malformed(action: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            action: action.to_string(),
            reason: reason.into(),
        }
    }

    /// Annotate this error with the operation, domain and record it belongs to.
    ///
    /// Validation errors are local and are returned unchanged.
    #[must_use]
    pub fn in_operation(self, operation: &'static str, domain: &str, record: &str) -> Self {
        match self {
            Self::Validation(_) | Self::Operation { .. } => self,
            other => Self::Operation {
                operation,
                domain: domain.to_string(),
                record: record.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with any operation annotations removed.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if this error is transient and the caller may retry later.
    ///
    /// Rate limits, transport failures and a record that could not yet be
    /// located after a successful write are transient. Nothing is retried
    /// internally.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Auth(AuthError::RateLimited { .. })
            | Self::Backend(BackendError::RateLimited { .. })
            | Self::Record(RecordError::UnresolvedRecordId { .. })
            | Self::Transport(
                TransportError::HttpConnectionFailed { .. }
                | TransportError::HttpRequestTimeout { .. }
                | TransportError::UnexpectedHttpResponse { .. },
            ) => true,

            Self::Validation(_)
            | Self::Auth(
                AuthError::InvalidCredentials { .. }
                | AuthError::AccountNotFound { .. }
                | AuthError::LoginFailed { .. },
            )
            | Self::Backend(
                BackendError::InvalidRecordFormat { .. }
                | BackendError::DomainNotAccessible { .. }
                | BackendError::RequestFailed { .. },
            )
            | Self::Record(RecordError::RecordNotFound { .. })
            | Self::InvalidIdentifier(_)
            | Self::Transport(TransportError::ClientBuild { .. })
            | Self::MalformedResponse { .. }
            | Self::Operation { .. } => false,
        }
    }

    /// A stable CamelCase reason code for this error, for logs and metrics labels.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self.root() {
            Self::Validation(_) => "ValidationFailed",

            Self::Auth(AuthError::InvalidCredentials { .. }) => "InvalidCredentials",
            Self::Auth(AuthError::AccountNotFound { .. }) => "AccountNotFound",
            Self::Auth(AuthError::RateLimited { .. }) => "LoginRateLimited",
            Self::Auth(AuthError::LoginFailed { .. }) => "LoginFailed",

            Self::Backend(BackendError::InvalidRecordFormat { .. }) => "InvalidRecordFormat",
            Self::Backend(BackendError::DomainNotAccessible { .. }) => "DomainNotAccessible",
            Self::Backend(BackendError::RateLimited { .. }) => "RateLimited",
            Self::Backend(BackendError::RequestFailed { .. }) => "BackendRequestFailed",

            Self::Record(RecordError::RecordNotFound { .. }) => "RecordNotFound",
            Self::Record(RecordError::UnresolvedRecordId { .. }) => "UnresolvedRecordId",

            Self::InvalidIdentifier(_) => "InvalidIdentifier",

            Self::Transport(TransportError::HttpConnectionFailed { .. }) => "HttpConnectionFailed",
            Self::Transport(TransportError::HttpRequestTimeout { .. }) => "HttpRequestTimeout",
            Self::Transport(TransportError::UnexpectedHttpResponse { .. }) => {
                "UnexpectedHttpResponse"
            }
            Self::Transport(TransportError::ClientBuild { .. }) => "ClientBuildFailed",

            Self::MalformedResponse { .. } => "MalformedResponse",

            Self::Operation { .. } => "OperationFailed",
        }
    }

    /// Returns true if the root cause is a record missing from the fetched set.
    #[must_use]
    pub fn is_record_not_found(&self) -> bool {
        matches!(
            self.root(),
            Self::Record(RecordError::RecordNotFound { .. })
        )
    }
}

/// Errors raised while loading provider configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent or empty
    #[error("missing required configuration value '{name}'")]
    Missing {
        /// Setting name (environment variable or config key)
        name: String,
    },

    /// The endpoint override is not a usable URL
    #[error("invalid API endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as supplied
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
