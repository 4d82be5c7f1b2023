//! Cooperative cancellation for long-running sweeps.
//!
//! A `CancelToken` is checked at iteration boundaries (directory scans,
//! commit-history walks). Cancellation never rolls back renames that were
//! already committed before it was observed.

use crate::error::{Result, SprintError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Err(`Cancelled`) once `cancel` has been called.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SprintError::Cancelled)
        } else {
            Ok(())
        }
    }
}
