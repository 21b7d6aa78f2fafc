// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{FileLock, UpdateLock};

#[test]
fn test_file_lock_creates_file_and_acquires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.lock");
    let lock = FileLock::new(&path);

    assert!(lock.try_acquire().unwrap());
    assert!(lock.is_held());
    assert!(path.exists());

    lock.release().unwrap();
    assert!(!lock.is_held());
}

#[test]
fn test_second_handle_is_excluded_while_held() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.lock");
    let first = FileLock::new(&path);
    let second = FileLock::new(&path);

    assert!(first.try_acquire().unwrap());
    assert!(!second.try_acquire().unwrap());
    assert!(!second.is_held());

    first.release().unwrap();
    assert!(second.try_acquire().unwrap());
    second.release().unwrap();
}

#[test]
fn test_reacquire_on_same_handle_fails_while_held() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::new(dir.path().join("update.lock"));

    assert!(lock.try_acquire().unwrap());
    assert!(!lock.try_acquire().unwrap());
    assert!(lock.is_held());
}

#[test]
fn test_release_when_free_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::new(dir.path().join("update.lock"));
    lock.release().unwrap();
    lock.release().unwrap();
}

#[test]
fn test_drop_releases_lock() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.lock");

    {
        let first = FileLock::new(&path);
        assert!(first.try_acquire().unwrap());
    }

    let second = FileLock::new(&path);
    assert!(second.try_acquire().unwrap());
}

#[test]
fn test_unopenable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::new(dir.path().join("missing").join("update.lock"));
    assert!(lock.try_acquire().is_err());
    assert_eq!(lock.path(), dir.path().join("missing").join("update.lock"));
}
