// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Scoped backend sessions.

use super::{DnsApi, Session};
use crate::dns_errors::DnsError;
use tracing::warn;

/// Run `op` inside a backend session.
///
/// Logs in, runs `op`, then logs out on every exit path: success, business
/// error or transport error. A failed logout is logged and counted but never
/// replaces the result of `op`; the session simply expires server-side.
///
/// # Errors
///
/// Returns the login error if no session could be opened, otherwise whatever
/// `op` returned.
pub async fn with_session<A, T, F>(api: &A, op: F) -> Result<T, DnsError>
where
    A: DnsApi + ?Sized,
    F: AsyncFnOnce(&Session) -> Result<T, DnsError>,
{
    let session = api.login().await?;

    let result = op(&session).await;

    if let Err(e) = api.logout(&session).await {
        warn!(error = %e, "Failed to end backend session, ignoring");
        crate::metrics::record_logout_failure();
    }

    result
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
