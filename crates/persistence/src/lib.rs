// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for billwatch.
//!
//! Stores finalized bills with their finance line items, the pending review
//! queue and the update run history. Built on Diesel.
//!
//! ## Backends
//!
//! - **`SQLite`** (default): in-memory for tests, file-backed (WAL) for
//!   single-host deployments.
//! - **`MariaDB`/`MySQL`**: always compiled, validated by `#[ignore]`d tests
//!   that only run through `cargo xtask test-mariadb`.
//!
//! The backend is chosen once when `Persistence` is constructed. Queries and
//! mutations are written once and generated per backend by `backend_fn!`;
//! `Persistence` dispatches on the connection kind.
//!
//! ## Migrations
//!
//! `migrations/` (`SQLite`) and `migrations_mysql/` (`MySQL`) are embedded in
//! the binary and applied on connect. They must stay schema-equivalent.

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
#![allow(clippy::multiple_crate_versions)]

use billwatch_domain::{Bill, BillCollection, BillFilters, BillOrder, FinalizedBill, PendingBill};
use diesel::{MysqlConnection, SqliteConnection};
use num_traits::ToPrimitive;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Source of unique names for in-memory databases, one per call.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a `_sqlite` and a `_mysql` copy of a function.
///
/// Diesel needs the concrete connection type at compile time, so a body
/// written against `conn: &mut _` is emitted twice, once per connection
/// type. The macro does nothing else; choosing a copy is the job of
/// `Persistence`.
///
/// ```ignore
/// backend_fn! {
///     pub fn count_rows(conn: &mut _) -> Result<i64, PersistenceError> {
///         Ok(bills::table.count().get_result(conn)?)
///     }
/// }
/// // count_rows_sqlite(&mut SqliteConnection) and
/// // count_rows_mysql(&mut MysqlConnection)
/// ```
macro_rules! backend_fn {
    (
        $(#[$meta:meta])*
        $vis:vis fn $name:ident (
            $conn:ident : &mut _
            $(, $param:ident : $param_ty:ty)* $(,)?
        ) -> $ret:ty
        $body:block
    ) => {
        pastey::paste! {
            $(#[$meta])*
            $vis fn [<$name _sqlite>] (
                $conn: &mut SqliteConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body

            $(#[$meta])*
            $vis fn [<$name _mysql>] (
                $conn: &mut MysqlConnection
                $(, $param : $param_ty)*
            ) -> $ret
            $body
        }
    };
}

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{PendingInsert, UpdateRunData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// The live database connection, one variant per supported backend.
pub enum BackendConnection {
    Sqlite(SqliteConnection),
    Mysql(MysqlConnection),
}

/// Backend-agnostic access to bills, pending bills and update runs.
pub struct Persistence {
    pub(crate) conn: BackendConnection,
}

impl Persistence {
    /// Opens a fresh, isolated in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:billwatch_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Opens (creating if needed) a file-backed `SQLite` database in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database cannot
    /// be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Sqlite(conn),
        })
    }

    /// Connects to a `MySQL`/`MariaDB` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or initialized.
    pub fn new_with_mysql(database_url: &str) -> Result<Self, PersistenceError> {
        let mut conn: MysqlConnection = backend::mysql::initialize_database(database_url)?;
        backend::mysql::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: BackendConnection::Mysql(conn),
        })
    }

    /// Re-checks that foreign keys are enforced on the live connection.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => conn.verify_foreign_key_enforcement(),
            BackendConnection::Mysql(conn) => conn.verify_foreign_key_enforcement(),
        }
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Selects up to `limit` finalized bill ids in listing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn select_bill_ids(
        &mut self,
        order: BillOrder,
        filters: &BillFilters,
        limit: usize,
    ) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::select_bill_ids_sqlite(conn, order, filters, limit)
            }
            BackendConnection::Mysql(conn) => {
                queries::select_bill_ids_mysql(conn, order, filters, limit)
            }
        }
    }

    /// Selects up to `limit` pending bill ids, oldest first, skipping `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn select_pending_bill_ids(
        &mut self,
        start: u64,
        limit: usize,
    ) -> Result<Vec<i64>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                queries::select_pending_bill_ids_sqlite(conn, start, limit)
            }
            BackendConnection::Mysql(conn) => {
                queries::select_pending_bill_ids_mysql(conn, start, limit)
            }
        }
    }

    /// Loads one bill by id. A missing id is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn load_bill(
        &mut self,
        id: i64,
        collection: BillCollection,
    ) -> Result<Option<Bill>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::load_bill_sqlite(conn, id, collection),
            BackendConnection::Mysql(conn) => queries::load_bill_mysql(conn, id, collection),
        }
    }

    /// Counts finalized bills.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_bills(&mut self) -> Result<usize, PersistenceError> {
        let count: i64 = match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::count_bills_sqlite(conn)?,
            BackendConnection::Mysql(conn) => queries::count_bills_mysql(conn)?,
        };
        count.to_usize().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!("negative bill count {count}"))
        })
    }

    /// Counts pending bills.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_pending_bills(&mut self) -> Result<usize, PersistenceError> {
        let count: i64 = match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::count_pending_bills_sqlite(conn)?,
            BackendConnection::Mysql(conn) => queries::count_pending_bills_mysql(conn)?,
        };
        count.to_usize().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!("negative pending bill count {count}"))
        })
    }

    // ========================================================================
    // Bill mutations
    // ========================================================================

    /// Persists a finalized bill and removes its pending twin.
    ///
    /// Idempotent: a bill that already has an id is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is written in that case.
    pub fn finalize_bill(&mut self, bill: &mut FinalizedBill) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::finalize_bill_sqlite(conn, bill),
            BackendConnection::Mysql(conn) => mutations::finalize_bill_mysql(conn, bill),
        }
    }

    /// Queues a bill for review unless its `cbo_url` is already known.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the insert fails.
    pub fn insert_pending_bill(
        &mut self,
        bill: &mut PendingBill,
    ) -> Result<PendingInsert, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::insert_pending_bill_sqlite(conn, bill),
            BackendConnection::Mysql(conn) => mutations::insert_pending_bill_mysql(conn, bill),
        }
    }

    // ========================================================================
    // Update runs
    // ========================================================================

    /// Records the start of an update run.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn begin_update_run(&mut self, started_at: OffsetDateTime) -> Result<i64, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => mutations::begin_update_run_sqlite(conn, started_at),
            BackendConnection::Mysql(conn) => mutations::begin_update_run_mysql(conn, started_at),
        }
    }

    /// Records a successful end of an update run.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or the update fails.
    pub fn complete_update_run(
        &mut self,
        run_id: i64,
        finished_at: OffsetDateTime,
        imported_count: usize,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::complete_update_run_sqlite(conn, run_id, finished_at, imported_count)
            }
            BackendConnection::Mysql(conn) => {
                mutations::complete_update_run_mysql(conn, run_id, finished_at, imported_count)
            }
        }
    }

    /// Records a failed end of an update run.
    ///
    /// # Errors
    ///
    /// Returns an error if the run does not exist or the update fails.
    pub fn fail_update_run(
        &mut self,
        run_id: i64,
        finished_at: OffsetDateTime,
        error_message: &str,
    ) -> Result<(), PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => {
                mutations::fail_update_run_sqlite(conn, run_id, finished_at, error_message)
            }
            BackendConnection::Mysql(conn) => {
                mutations::fail_update_run_mysql(conn, run_id, finished_at, error_message)
            }
        }
    }

    /// Returns the most recently finished successful update run.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn latest_successful_update_run(
        &mut self,
    ) -> Result<Option<UpdateRunData>, PersistenceError> {
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::latest_successful_update_run_sqlite(conn),
            BackendConnection::Mysql(conn) => queries::latest_successful_update_run_mysql(conn),
        }
    }

    /// Lists up to `limit` update runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_update_runs(&mut self, limit: usize) -> Result<Vec<UpdateRunData>, PersistenceError> {
        let limit: i64 = limit
            .to_i64()
            .ok_or_else(|| PersistenceError::InvalidParameter {
                parameter: "limit",
                message: format!("limit {limit} is too large"),
            })?;
        match &mut self.conn {
            BackendConnection::Sqlite(conn) => queries::list_update_runs_sqlite(conn, limit),
            BackendConnection::Mysql(conn) => queries::list_update_runs_mysql(conn, limit),
        }
    }
}
