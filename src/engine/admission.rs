// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Global admission limit for running work callbacks.
//!
//! A permit is an RAII guard: it returns its slot when dropped, and only a
//! node that was actually admitted ever holds one. Nodes skipped because of
//! a failed dependency never touch the pool.

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

pub(crate) struct AdmissionPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionPool {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    pub(crate) async fn admit(&self) -> Result<AdmissionPermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(AdmissionPermit { _permit: permit })
    }

    pub(crate) fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

/// One admitted slot, released on drop.
pub(crate) struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let pool = AdmissionPool::new(2);
        let first = pool.admit().await.unwrap();
        let second = pool.admit().await.unwrap();
        assert_eq!(pool.available(), 0);

        drop(first);
        assert_eq!(pool.available(), 1);
        drop(second);
        assert_eq!(pool.available(), pool.capacity());
    }

    #[tokio::test]
    async fn test_admit_blocks_when_saturated() {
        let pool = AdmissionPool::new(1);
        let held = pool.admit().await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(20), pool.admit()).await;
        assert!(blocked.is_err());

        drop(held);
        let admitted = tokio::time::timeout(Duration::from_millis(20), pool.admit()).await;
        assert!(admitted.is_ok());
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let pool = AdmissionPool::new(0);
        assert_eq!(pool.capacity(), 1);
        assert_eq!(pool.available(), 1);
    }
}
