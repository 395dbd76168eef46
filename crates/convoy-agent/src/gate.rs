//! Concurrency gate bounding subprocess-spawning RPCs.
//!
//! Every ExecuteCommand, ExecuteShell, and Copy handler takes a permit before
//! doing any work and holds it until the call finishes, capping the number of
//! subprocesses a single agent will run at once.

use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Fixed-capacity permit gate.
#[derive(Debug, Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

/// A held permit. The permit returns to the gate when dropped, so a handler
/// cannot leak or double-release it.
#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}

impl Gate {
    /// Creates a gate with the given capacity; capacities below 1 are clamped.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Waits until a permit is free.
    ///
    /// Dropping the returned future (RPC cancellation) leaves the gate
    /// untouched.
    ///
    /// # Errors
    ///
    /// Fails only if the gate has been closed, which does not happen during
    /// normal operation.
    pub async fn acquire(&self) -> Result<Permit, AcquireError> {
        let permit = Arc::clone(&self.permits).acquire_owned().await?;
        Ok(Permit { _permit: permit })
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn capacity_bounds_concurrent_holders() {
        let gate = Gate::new(2);

        let first = gate.acquire().await.unwrap();
        let _second = gate.acquire().await.unwrap();
        assert_eq!(gate.available(), 0);

        // A third acquire must block until a permit frees up.
        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(blocked.is_err(), "third acquire should block");

        drop(first);
        let third = tokio::time::timeout(Duration::from_millis(200), gate.acquire())
            .await
            .expect("acquire should proceed after release");
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn cancelled_acquire_does_not_consume_a_permit() {
        let gate = Gate::new(1);
        let held = gate.acquire().await.unwrap();

        let waiter = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(waiter.is_err());

        drop(held);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let gate = Gate::new(0);
        assert_eq!(gate.available(), 1);
    }
}
