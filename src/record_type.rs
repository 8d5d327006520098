// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Supported DNS record types and their per-type field rules.
//!
//! Each variant carries its own rules in [`RecordType::rules`]; adding a type
//! means adding a variant and one arm there.

use std::fmt;
use std::str::FromStr;

/// Field rules attached to a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRules {
    /// Canonical upper-case type name as used on the wire
    pub name: &'static str,
    /// The record needs a non-empty `priority`
    pub requires_priority: bool,
    /// The record may be placed at the zone apex (`@`)
    pub allows_apex: bool,
}

impl TypeRules {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            requires_priority: false,
            allows_apex: true,
        }
    }

    const fn with_priority(mut self) -> Self {
        self.requires_priority = true;
        self
    }

    const fn without_apex(mut self) -> Self {
        self.allows_apex = false;
        self
    }
}

/// DNS record types accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Mx,
    Cname,
    Caa,
    Srv,
    Txt,
    Tlsa,
    Ns,
    Ds,
    OpenPgpKey,
    Smimea,
    Sshfp,
}

impl RecordType {
    /// Every supported type, in the order they are listed to users.
    pub const ALL: [Self; 13] = [
        Self::A,
        Self::Aaaa,
        Self::Mx,
        Self::Cname,
        Self::Caa,
        Self::Srv,
        Self::Txt,
        Self::Tlsa,
        Self::Ns,
        Self::Ds,
        Self::OpenPgpKey,
        Self::Smimea,
        Self::Sshfp,
    ];

    /// The field rules for this type.
    #[must_use]
    pub const fn rules(self) -> TypeRules {
        match self {
            Self::A => TypeRules::new("A"),
            Self::Aaaa => TypeRules::new("AAAA"),
            Self::Mx => TypeRules::new("MX").with_priority(),
            Self::Cname => TypeRules::new("CNAME").without_apex(),
            Self::Caa => TypeRules::new("CAA"),
            Self::Srv => TypeRules::new("SRV").with_priority(),
            Self::Txt => TypeRules::new("TXT"),
            Self::Tlsa => TypeRules::new("TLSA"),
            Self::Ns => TypeRules::new("NS"),
            Self::Ds => TypeRules::new("DS"),
            Self::OpenPgpKey => TypeRules::new("OPENPGPKEY"),
            Self::Smimea => TypeRules::new("SMIMEA"),
            Self::Sshfp => TypeRules::new("SSHFP"),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.rules().name
    }

    #[must_use]
    pub const fn requires_priority(self) -> bool {
        self.rules().requires_priority
    }

    #[must_use]
    pub const fn allows_apex(self) -> bool {
        self.rules().allows_apex
    }

    /// Comma-separated list of supported type names, for error messages.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no supported record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedRecordType(pub String);

impl fmt::Display for UnsupportedRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported DNS record type: {}. Valid types are: {}",
            self.0,
            RecordType::supported_list()
        )
    }
}

impl std::error::Error for UnsupportedRecordType {}

impl FromStr for RecordType {
    type Err = UnsupportedRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnsupportedRecordType(s.to_string()))
    }
}

/// Whether a (possibly unsupported) type string needs a priority.
///
/// Unknown types never require one.
#[must_use]
pub fn requires_priority(record_type: &str) -> bool {
    record_type
        .parse::<RecordType>()
        .is_ok_and(RecordType::requires_priority)
}

#[cfg(test)]
#[path = "record_type_tests.rs"]
mod record_type_tests;
