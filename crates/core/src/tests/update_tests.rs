// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryLock, ScriptedTask, StuckLock};
use crate::{UpdateCoordinator, UpdateError, UpdateLock, UpdateOutcome, UpdateTask};
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_runs_task_when_lock_free_and_needed() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask::needed();

    let outcome = coordinator.try_run(&mut task).unwrap();

    assert_eq!(outcome, UpdateOutcome::Completed);
    assert_eq!(task.runs, 1);
    assert!(!coordinator.lock().is_held());
    assert_eq!(coordinator.lock().releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_not_needed_releases_without_running() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask::default();

    let outcome = coordinator.try_run(&mut task).unwrap();

    assert_eq!(outcome, UpdateOutcome::NotNeeded);
    assert_eq!(task.checks, 1);
    assert_eq!(task.runs, 0);
    assert!(!coordinator.lock().is_held());
}

#[test]
fn test_held_lock_short_circuits() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    assert!(coordinator.lock().try_acquire().unwrap());
    let mut task = ScriptedTask::needed();

    let outcome = coordinator.try_run(&mut task).unwrap();

    assert_eq!(outcome, UpdateOutcome::AlreadyRunning);
    assert_eq!(task.checks, 0);
    assert_eq!(task.runs, 0);
    // The foreign holder keeps the lock
    assert!(coordinator.lock().is_held());
    assert_eq!(coordinator.lock().releases.load(Ordering::SeqCst), 0);
}

#[test]
fn test_task_error_still_releases_lock() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask {
        fail_run: true,
        ..ScriptedTask::needed()
    };

    let result = coordinator.try_run(&mut task);

    assert!(matches!(result, Err(UpdateError::Task(_))));
    assert!(!coordinator.lock().is_held());
    assert_eq!(coordinator.lock().releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_check_error_still_releases_lock() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask {
        fail_check: true,
        ..ScriptedTask::needed()
    };

    let result = coordinator.try_run(&mut task);

    assert!(matches!(result, Err(UpdateError::Task(_))));
    assert_eq!(task.runs, 0);
    assert!(!coordinator.lock().is_held());
}

#[test]
fn test_panic_in_task_releases_lock() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask {
        panic_in_run: true,
        ..ScriptedTask::needed()
    };

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        coordinator.try_run(&mut task)
    }));

    assert!(result.is_err());
    assert!(!coordinator.lock().is_held());
}

#[test]
fn test_release_failure_is_reported() {
    let coordinator = UpdateCoordinator::new(StuckLock);
    let mut task = ScriptedTask::needed();

    let result = coordinator.try_run(&mut task);

    assert!(matches!(result, Err(UpdateError::Lock(_))));
    assert_eq!(task.runs, 1);
}

#[test]
fn test_should_run_does_not_touch_lock() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());
    let mut task = ScriptedTask::needed();

    assert!(coordinator.should_run(&mut task).unwrap());
    assert!(!coordinator.lock().is_held());
    assert_eq!(coordinator.lock().releases.load(Ordering::SeqCst), 0);
}

#[test]
fn test_lock_can_be_reacquired_after_run() {
    let coordinator = UpdateCoordinator::new(MemoryLock::default());

    for _ in 0..3 {
        let mut task = ScriptedTask::needed();
        assert_eq!(
            coordinator.try_run(&mut task).unwrap(),
            UpdateOutcome::Completed
        );
    }
}

/// Blocks inside `run` until told to continue.
struct GatedTask {
    started: mpsc::Sender<()>,
    proceed: mpsc::Receiver<()>,
    runs: Arc<Mutex<usize>>,
}

impl UpdateTask for GatedTask {
    type Error = super::helpers::TaskError;

    fn should_run(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn run(&mut self) -> Result<(), Self::Error> {
        *self.runs.lock().unwrap() += 1;
        self.started.send(()).unwrap();
        self.proceed.recv().unwrap();
        Ok(())
    }
}

#[test]
fn test_concurrent_trigger_observes_already_running() {
    let coordinator = Arc::new(UpdateCoordinator::new(MemoryLock::default()));
    let runs = Arc::new(Mutex::new(0_usize));
    let (started_tx, started_rx) = mpsc::channel();
    let (proceed_tx, proceed_rx) = mpsc::channel();

    let worker = {
        let coordinator = Arc::clone(&coordinator);
        let runs = Arc::clone(&runs);
        thread::spawn(move || {
            let mut task = GatedTask {
                started: started_tx,
                proceed: proceed_rx,
                runs,
            };
            coordinator.try_run(&mut task).unwrap()
        })
    };

    started_rx.recv().unwrap();

    let mut contender = ScriptedTask::needed();
    let outcome = coordinator.try_run(&mut contender).unwrap();
    assert_eq!(outcome, UpdateOutcome::AlreadyRunning);
    assert_eq!(contender.runs, 0);

    proceed_tx.send(()).unwrap();
    assert_eq!(worker.join().unwrap(), UpdateOutcome::Completed);
    assert_eq!(*runs.lock().unwrap(), 1);
    assert!(!coordinator.lock().is_held());
}

#[test]
fn test_outcome_names() {
    assert_eq!(UpdateOutcome::Completed.as_str(), "completed");
    assert_eq!(UpdateOutcome::AlreadyRunning.to_string(), "already_running");
    assert_eq!(UpdateOutcome::NotNeeded.as_str(), "not_needed");
}
