// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod file_lock;
mod pager;
mod update;

#[cfg(test)]
mod tests;

pub use error::{CoreError, UpdateError};
pub use file_lock::FileLock;
pub use pager::{DEFAULT_PAGE_SIZE, Page, PageSize, paginate};
pub use update::{UpdateCoordinator, UpdateLock, UpdateOutcome, UpdateTask};
