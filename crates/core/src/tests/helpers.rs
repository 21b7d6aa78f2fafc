// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CoreError, UpdateLock, UpdateTask};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An in-memory lock that counts releases.
#[derive(Debug, Default)]
pub struct MemoryLock {
    held: AtomicBool,
    pub releases: AtomicUsize,
}

impl MemoryLock {
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

impl UpdateLock for MemoryLock {
    fn try_acquire(&self) -> Result<bool, CoreError> {
        Ok(self
            .held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok())
    }

    fn release(&self) -> Result<(), CoreError> {
        self.held.store(false, Ordering::SeqCst);
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A lock whose release always fails.
#[derive(Debug, Default)]
pub struct StuckLock;

impl UpdateLock for StuckLock {
    fn try_acquire(&self) -> Result<bool, CoreError> {
        Ok(true)
    }

    fn release(&self) -> Result<(), CoreError> {
        Err(CoreError::LockPoisoned)
    }
}

#[derive(Debug)]
pub struct TaskError(pub &'static str);

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TaskError {}

/// A task with fixed answers that records how often it was consulted.
#[derive(Debug, Default)]
pub struct ScriptedTask {
    pub needed: bool,
    pub fail_check: bool,
    pub fail_run: bool,
    pub panic_in_run: bool,
    pub checks: usize,
    pub runs: usize,
}

impl ScriptedTask {
    pub fn needed() -> Self {
        Self {
            needed: true,
            ..Self::default()
        }
    }
}

impl UpdateTask for ScriptedTask {
    type Error = TaskError;

    fn should_run(&mut self) -> Result<bool, Self::Error> {
        self.checks += 1;
        if self.fail_check {
            return Err(TaskError("check failed"));
        }
        Ok(self.needed)
    }

    fn run(&mut self) -> Result<(), Self::Error> {
        self.runs += 1;
        if self.panic_in_run {
            panic!("refresh exploded");
        }
        if self.fail_run {
            return Err(TaskError("refresh failed"));
        }
        Ok(())
    }
}
