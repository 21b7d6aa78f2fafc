// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use billwatch_domain::format_timestamp;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::update_runs;
use crate::error::PersistenceError;

fn stored_timestamp(
    parameter: &'static str,
    instant: OffsetDateTime,
) -> Result<String, PersistenceError> {
    format_timestamp(instant).map_err(|e| PersistenceError::InvalidParameter {
        parameter,
        message: e.to_string(),
    })
}

backend_fn! {
/// Records the start of an update run and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn begin_update_run(
    conn: &mut _,
    started_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let started: String = stored_timestamp("started_at", started_at)?;
    diesel::insert_into(update_runs::table)
        .values((
            update_runs::started_at.eq(started),
            update_runs::succeeded.eq(0),
            update_runs::imported_count.eq(0),
        ))
        .execute(conn)?;
    let run_id: i64 = conn.get_last_insert_rowid()?;

    info!(run_id, "Update run started");
    Ok(run_id)
}
}

backend_fn! {
/// Marks an update run as finished successfully.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such run exists, or another
/// error if the update fails.
pub fn complete_update_run(
    conn: &mut _,
    run_id: i64,
    finished_at: OffsetDateTime,
    imported_count: usize,
) -> Result<(), PersistenceError> {
    let imported: i32 = imported_count.to_i32().ok_or_else(|| {
        PersistenceError::InvalidParameter {
            parameter: "imported_count",
            message: format!("{imported_count} does not fit the update run record"),
        }
    })?;
    let finished: String = stored_timestamp("finished_at", finished_at)?;

    let updated: usize = diesel::update(update_runs::table.find(run_id))
        .set((
            update_runs::finished_at.eq(Some(finished)),
            update_runs::succeeded.eq(1),
            update_runs::imported_count.eq(imported),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("update run {run_id}")));
    }

    info!(run_id, imported_count, "Update run completed");
    Ok(())
}
}

backend_fn! {
/// Marks an update run as finished with an error.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such run exists, or another
/// error if the update fails.
pub fn fail_update_run(
    conn: &mut _,
    run_id: i64,
    finished_at: OffsetDateTime,
    error_message: &str,
) -> Result<(), PersistenceError> {
    let finished: String = stored_timestamp("finished_at", finished_at)?;
    let updated: usize = diesel::update(update_runs::table.find(run_id))
        .set((
            update_runs::finished_at.eq(Some(finished)),
            update_runs::succeeded.eq(0),
            update_runs::error_message.eq(Some(error_message)),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("update run {run_id}")));
    }

    warn!(run_id, error_message, "Update run failed");
    Ok(())
}
}
