// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::update::UpdateLock;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// An [`UpdateLock`] backed by an exclusive advisory lock on a file.
///
/// The lock is taken on an open file description, so two `FileLock`s on the
/// same path exclude each other even inside one process. The lock file is
/// created on first use and never removed.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    held: Mutex<Option<File>>,
}

impl FileLock {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            held: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this handle currently holds the lock.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.lock().is_ok_and(|held| held.is_some())
    }

    fn open(&self) -> Result<File, CoreError> {
        OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| CoreError::LockOpen {
                path: self.path.clone(),
                source,
            })
    }
}

fn is_contended(error: &std::io::Error) -> bool {
    error.kind() == ErrorKind::WouldBlock
        || error.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl UpdateLock for FileLock {
    fn try_acquire(&self) -> Result<bool, CoreError> {
        let mut held = self.held.lock().map_err(|_| CoreError::LockPoisoned)?;
        if held.is_some() {
            return Ok(false);
        }

        let file: File = self.open()?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %self.path.display(), "Acquired update lock");
                *held = Some(file);
                Ok(true)
            }
            Err(e) if is_contended(&e) => Ok(false),
            Err(source) => Err(CoreError::LockAcquire {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn release(&self) -> Result<(), CoreError> {
        let mut held = self.held.lock().map_err(|_| CoreError::LockPoisoned)?;
        let Some(file) = held.take() else {
            return Ok(());
        };

        FileExt::unlock(&file).map_err(|source| CoreError::LockRelease {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Released update lock");
        Ok(())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let held = match self.held.get_mut() {
            Ok(held) => held,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(file) = held.take() else {
            return;
        };
        if let Err(e) = FileExt::unlock(&file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release update lock on drop");
        }
    }
}
