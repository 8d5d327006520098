// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider configuration: API credentials and endpoint.
//!
//! Credentials are never printed; the `Debug` implementation redacts them.

use crate::constants::{
    ENV_API_KEY, ENV_API_PASSWORD, ENV_CUSTOMER_ID, ENV_ENDPOINT, NETCUP_API_ENDPOINT,
};
use crate::dns_errors::ConfigError;
use serde::Deserialize;
use std::fmt;

/// Credentials and endpoint for the netcup CCP API.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// API key generated in the customer control panel
    pub api_key: String,
    /// API password generated in the customer control panel
    pub api_password: String,
    /// Customer number
    pub customer_id: String,
    /// API endpoint; defaults to the public CCP endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    NETCUP_API_ENDPOINT.to_string()
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("api_password", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a configuration for the default endpoint.
    pub fn new(
        api_key: impl Into<String>,
        api_password: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_password: api_password.into(),
            customer_id: customer_id.into(),
            endpoint: default_endpoint(),
        }
    }

    /// Override the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Load configuration from `NETCUP_API_KEY`, `NETCUP_API_PASSWORD`,
    /// `NETCUP_CUSTOMER_ID` and the optional `NETCUP_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or empty, or
    /// if the endpoint is not a valid http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::Missing {
                    name: name.to_string(),
                })
        };

        let config = Self {
            api_key: required(ENV_API_KEY)?,
            api_password: required(ENV_API_PASSWORD)?,
            customer_id: required(ENV_CUSTOMER_ID)?,
            endpoint: lookup(ENV_ENDPOINT)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(default_endpoint),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every credential is present and the endpoint is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("apiKey", &self.api_key),
            ("apiPassword", &self.api_password),
            ("customerId", &self.customer_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing {
                    name: name.to_string(),
                });
            }
        }

        let url = url::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
