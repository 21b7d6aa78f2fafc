// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `bills`: finalizing bills and queueing pending bills
//! - `updates`: recording update runs
//!
//! Generated ids are read back through `PersistenceBackend` because
//! `RETURNING` is not available on every supported backend.

pub mod bills;
pub mod updates;

pub use bills::{
    finalize_bill_mysql, finalize_bill_sqlite, insert_pending_bill_mysql,
    insert_pending_bill_sqlite,
};
pub use updates::{
    begin_update_run_mysql, begin_update_run_sqlite, complete_update_run_mysql,
    complete_update_run_sqlite, fail_update_run_mysql, fail_update_run_sqlite,
};
