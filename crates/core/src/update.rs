// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single-flight execution of the update task.
//!
//! Any number of callers may ask for an update at the same time. The first
//! one to take the lock re-checks whether the update is still needed and
//! runs it; everyone else returns immediately with
//! [`UpdateOutcome::AlreadyRunning`]. Acquisition never blocks and nothing
//! is queued.

use crate::error::{CoreError, UpdateError};
use tracing::{debug, info, warn};

/// A process-wide, non-blocking mutual-exclusion token.
///
/// State machine: FREE --`try_acquire`--> HELD --`release`--> FREE.
/// `try_acquire` on HELD returns `Ok(false)` and leaves the state unchanged.
pub trait UpdateLock: Send + Sync {
    /// Attempts to take the lock without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error only when the lock could not be inspected at all.
    /// Contention is reported as `Ok(false)`.
    fn try_acquire(&self) -> Result<bool, CoreError>;

    /// Releases the lock. Releasing a free lock is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying primitive refuses the release.
    fn release(&self) -> Result<(), CoreError>;
}

/// The refresh work guarded by the coordinator.
pub trait UpdateTask {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether the refresh is currently needed.
    ///
    /// # Errors
    ///
    /// Returns the task's error if the staleness check itself fails.
    fn should_run(&mut self) -> Result<bool, Self::Error>;

    /// Performs the refresh.
    ///
    /// # Errors
    ///
    /// Returns the task's error if the refresh fails.
    fn run(&mut self) -> Result<(), Self::Error>;
}

/// Result of a coordinated update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOutcome {
    /// This caller held the lock and ran the task to completion.
    Completed,
    /// Another run held the lock; nothing was done.
    AlreadyRunning,
    /// The lock was taken but the task reported it was not needed.
    NotNeeded,
}

impl UpdateOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::AlreadyRunning => "already_running",
            Self::NotNeeded => "not_needed",
        }
    }
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Releases the lock when dropped unless released explicitly first.
struct HeldLock<'a, L: UpdateLock> {
    lock: &'a L,
    released: bool,
}

impl<L: UpdateLock> HeldLock<'_, L> {
    fn release(mut self) -> Result<(), CoreError> {
        self.released = true;
        self.lock.release()
    }
}

impl<L: UpdateLock> Drop for HeldLock<'_, L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.lock.release() {
            warn!(error = %e, "Failed to release update lock");
        }
    }
}

/// Owns the update lock and runs tasks under it.
#[derive(Debug)]
pub struct UpdateCoordinator<L: UpdateLock> {
    lock: L,
}

impl<L: UpdateLock> UpdateCoordinator<L> {
    #[must_use]
    pub const fn new(lock: L) -> Self {
        Self { lock }
    }

    #[must_use]
    pub const fn lock(&self) -> &L {
        &self.lock
    }

    /// Asks the task whether an update is needed, without taking the lock.
    ///
    /// This is the cheap hint used when rendering listings; the answer is
    /// checked again under the lock by [`Self::try_run`].
    ///
    /// # Errors
    ///
    /// Returns the task's error if the staleness check fails.
    pub fn should_run<T: UpdateTask>(&self, task: &mut T) -> Result<bool, T::Error> {
        task.should_run()
    }

    /// Runs the task at most once, only if the lock is free and the task
    /// still reports it is needed.
    ///
    /// The lock is released on every path out of this function, including
    /// task errors and panics.
    ///
    /// # Errors
    ///
    /// Returns `UpdateError::Lock` if the lock could not be inspected or
    /// released, and `UpdateError::Task` if the task failed.
    pub fn try_run<T: UpdateTask>(
        &self,
        task: &mut T,
    ) -> Result<UpdateOutcome, UpdateError<T::Error>> {
        if !self.lock.try_acquire()? {
            info!("Update already in progress, skipping");
            return Ok(UpdateOutcome::AlreadyRunning);
        }
        let held = HeldLock {
            lock: &self.lock,
            released: false,
        };

        if !task.should_run().map_err(UpdateError::Task)? {
            debug!("Update no longer needed after acquiring lock");
            held.release()?;
            return Ok(UpdateOutcome::NotNeeded);
        }

        info!("Running update task");
        task.run().map_err(UpdateError::Task)?;
        held.release()?;
        info!("Update task completed");

        Ok(UpdateOutcome::Completed)
    }
}
