// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the netcup DNS reconciler.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Backend Endpoint Constants
// ============================================================================

/// The single JSON endpoint of the netcup CCP API
pub const NETCUP_API_ENDPOINT: &str =
    "https://ccp.netcup.net/run/webservice/servers/endpoint.php?JSON";

/// Absolute timeout for every HTTP exchange with the backend.
///
/// This is a resource-exhaustion guard and is intentionally not configurable.
pub const API_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Backend Action Names
// ============================================================================

/// Opens an API session
pub const ACTION_LOGIN: &str = "login";

/// Closes an API session
pub const ACTION_LOGOUT: &str = "logout";

/// Returns the complete record set of a zone
pub const ACTION_INFO_DNS_RECORDS: &str = "infoDnsRecords";

/// Replaces the complete record set of a zone
pub const ACTION_UPDATE_DNS_RECORDS: &str = "updateDnsRecords";

/// Value of the `status` field on a successful response
pub const STATUS_SUCCESS: &str = "success";

// ============================================================================
// Backend Status Codes
// ============================================================================

/// Login rejected: API key or password incorrect
pub const STATUS_CODE_INVALID_CREDENTIALS: i64 = 2011;

/// Login rejected: customer number unknown
pub const STATUS_CODE_ACCOUNT_NOT_FOUND: i64 = 2029;

/// More than 180 requests per minute
pub const STATUS_CODE_RATE_LIMITED: i64 = 2057;

/// Domain not found or not accessible with the current credentials
pub const STATUS_CODE_DOMAIN_NOT_ACCESSIBLE: i64 = 2016;

/// Submitted record set is not in a valid format
pub const STATUS_CODE_INVALID_RECORD_FORMAT: i64 = 4013;

// ============================================================================
// Record Identity Constants
// ============================================================================

/// Separator between domain and backend record id in a composite identifier
pub const COMPOSITE_ID_SEPARATOR: char = ':';

/// Placeholder record id returned by dry-run creates
pub const PREVIEW_RECORD_ID: &str = "preview-id";

/// Hostname that denotes the zone apex
pub const APEX_NAME: &str = "@";

// ============================================================================
// Configuration Environment Variables
// ============================================================================

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "NETCUP_API_KEY";

/// Environment variable holding the API password
pub const ENV_API_PASSWORD: &str = "NETCUP_API_PASSWORD";

/// Environment variable holding the customer number
pub const ENV_CUSTOMER_ID: &str = "NETCUP_CUSTOMER_ID";

/// Optional environment variable overriding the API endpoint
pub const ENV_ENDPOINT: &str = "NETCUP_ENDPOINT";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the CLI Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;
