// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by paging configuration and the update lock.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A page must hold at least one item.
    #[error("Invalid page size {0}: must be greater than 0")]
    InvalidPageSize(usize),
    /// The lock file could not be opened or created.
    #[error("Failed to open lock file '{}': {source}", path.display())]
    LockOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The operating system refused the lock for a reason other than
    /// contention.
    #[error("Failed to acquire lock '{}': {source}", path.display())]
    LockAcquire {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to release lock '{}': {source}", path.display())]
    LockRelease {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A thread panicked while holding the in-process lock state.
    #[error("Lock state poisoned")]
    LockPoisoned,
}

/// Failure of a coordinated update run.
///
/// Keeps lock failures apart from failures of the task itself so callers
/// can report them differently.
#[derive(Debug, Error)]
pub enum UpdateError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Update lock error: {0}")]
    Lock(#[from] CoreError),
    #[error("Update task failed: {0}")]
    Task(#[source] E),
}
