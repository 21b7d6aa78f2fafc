// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{UpdateRunData, UpdateRunRow};
use crate::diesel_schema::update_runs;
use crate::error::PersistenceError;

backend_fn! {
/// Returns the most recently finished successful update run, if any.
///
/// Timestamps are stored as fixed-width UTC text, so ordering by the text
/// orders by time.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is malformed.
pub fn latest_successful_update_run(
    conn: &mut _,
) -> Result<Option<UpdateRunData>, PersistenceError> {
    let row: Option<UpdateRunRow> = update_runs::table
        .filter(update_runs::succeeded.eq(1))
        .filter(update_runs::finished_at.is_not_null())
        .order_by((update_runs::finished_at.desc(), update_runs::run_id.desc()))
        .select(UpdateRunRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UpdateRunRow::into_data).transpose()
}
}

backend_fn! {
/// Lists update runs, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is malformed.
pub fn list_update_runs(
    conn: &mut _,
    limit: i64,
) -> Result<Vec<UpdateRunData>, PersistenceError> {
    let rows: Vec<UpdateRunRow> = update_runs::table
        .order_by(update_runs::run_id.desc())
        .limit(limit)
        .select(UpdateRunRow::as_select())
        .load(conn)?;

    rows.into_iter().map(UpdateRunRow::into_data).collect()
}
}
