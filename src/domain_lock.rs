// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-domain serialization of fetch-modify-submit cycles.
//!
//! Two writers of the same zone race: the later submit silently discards the
//! earlier one. The reconciler acquires a [`DomainLock`] around every
//! read-modify-write so an embedding application can serialize them. The
//! default [`NoDomainLock`] does nothing; [`InProcessDomainLocks`] serializes
//! within one process. Cross-process coordination needs an implementation
//! backed by something shared.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held for the duration of one fetch-modify-submit cycle.
#[derive(Debug)]
pub struct DomainGuard {
    guard: Option<OwnedMutexGuard<()>>,
}

impl DomainGuard {
    /// A guard that holds nothing.
    #[must_use]
    pub fn unlocked() -> Self {
        Self { guard: None }
    }

    /// Whether this guard actually excludes other holders.
    #[must_use]
    pub fn is_exclusive(&self) -> bool {
        self.guard.is_some()
    }
}

/// Capability to serialize record-set writes per domain.
#[async_trait]
pub trait DomainLock: Send + Sync {
    /// Wait until the domain is free and take it.
    async fn acquire(&self, domain: &str) -> DomainGuard;
}

/// No serialization; concurrent operations on one domain may lose writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDomainLock;

#[async_trait]
impl DomainLock for NoDomainLock {
    async fn acquire(&self, _domain: &str) -> DomainGuard {
        DomainGuard::unlocked()
    }
}

/// One async mutex per domain, shared by every reconciler in this process.
#[derive(Debug, Default)]
pub struct InProcessDomainLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InProcessDomainLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domains currently tracked.
    #[must_use]
    pub fn tracked_domains(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Entries referenced only by the map are idle and dropped on the way in.
    fn lock_for(&self, domain: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(domain.to_ascii_lowercase())
            .or_default()
            .clone()
    }
}

#[async_trait]
impl DomainLock for InProcessDomainLocks {
    async fn acquire(&self, domain: &str) -> DomainGuard {
        let lock = self.lock_for(domain);
        DomainGuard {
            guard: Some(lock.lock_owned().await),
        }
    }
}

#[cfg(test)]
#[path = "domain_lock_tests.rs"]
mod domain_lock_tests;
