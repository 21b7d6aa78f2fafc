// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `planner`: ordered, filtered, bounded bill id selection
//! - `bills`: hydration of single bills and collection counts
//! - `updates`: update run history
//!
//! Every function exists as a `_sqlite` and a `_mysql` variant generated by
//! `backend_fn!`; `Persistence` in `lib.rs` picks one per connection.

pub mod bills;
pub mod planner;
pub mod updates;

pub use bills::{
    count_bills_mysql, count_bills_sqlite, count_pending_bills_mysql, count_pending_bills_sqlite,
    load_bill_mysql, load_bill_sqlite,
};
pub use planner::{
    select_bill_ids_mysql, select_bill_ids_sqlite, select_pending_bill_ids_mysql,
    select_pending_bill_ids_sqlite,
};
pub use updates::{
    latest_successful_update_run_mysql, latest_successful_update_run_sqlite,
    list_update_runs_mysql, list_update_runs_sqlite,
};
