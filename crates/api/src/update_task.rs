// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The refresh that fills the pending queue, and when it is due.
//!
//! The feed is a JSON array of bill payloads in the same shape clients
//! submit, minus `finances`. Each run is recorded in `update_runs`; the
//! most recent successful run drives the staleness check.

use billwatch::UpdateTask;
use billwatch_domain::{BillInput, PendingBill, validate_bill_input};
use billwatch_persistence::{PendingInsert, Persistence, PersistenceError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Default time between successful updates.
pub const DEFAULT_UPDATE_INTERVAL_HOURS: u32 = 24;

/// How old the last successful update may get before a new one is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    interval: Duration,
}

impl StalenessPolicy {
    #[must_use]
    pub fn from_hours(hours: u32) -> Self {
        Self {
            interval: Duration::hours(i64::from(hours)),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether an update is due given when the last successful one finished.
    #[must_use]
    pub fn is_stale(&self, last_success: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
        last_success.is_none_or(|finished| now - finished >= self.interval)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_hours(DEFAULT_UPDATE_INTERVAL_HOURS)
    }
}

/// Checks the run history against `policy`.
///
/// # Errors
///
/// Returns an error if the run history cannot be read.
pub fn should_run_update(
    persistence: &mut Persistence,
    policy: &StalenessPolicy,
    now: OffsetDateTime,
) -> Result<bool, PersistenceError> {
    let last_success: Option<OffsetDateTime> = persistence
        .latest_successful_update_run()?
        .and_then(|run| run.finished_at);
    Ok(policy.is_stale(last_success, now))
}

/// Failure of a feed refresh.
#[derive(Debug)]
pub enum RefreshError {
    /// Reading or writing the database failed.
    Persistence(PersistenceError),
    /// The feed file could not be read.
    FeedRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The feed file is not a JSON array.
    FeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(e) => write!(f, "Persistence error: {e}"),
            Self::FeedRead { path, source } => {
                write!(f, "Failed to read feed '{}': {source}", path.display())
            }
            Self::FeedParse { path, source } => {
                write!(f, "Feed '{}' is not a JSON array: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RefreshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(e) => Some(e),
            Self::FeedRead { source, .. } => Some(source),
            Self::FeedParse { source, .. } => Some(source),
        }
    }
}

impl From<PersistenceError> for RefreshError {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

/// Reads the raw entries of a feed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub fn load_feed(path: &Path) -> Result<Vec<serde_json::Value>, RefreshError> {
    let contents: String = std::fs::read_to_string(path).map_err(|source| RefreshError::FeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RefreshError::FeedParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Turns raw feed entries into pending bills.
///
/// Entries that are malformed or fail validation are logged and dropped;
/// they never fail the run.
#[must_use]
pub fn parse_feed_entries(entries: Vec<serde_json::Value>) -> Vec<PendingBill> {
    let mut bills: Vec<PendingBill> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let input: BillInput = match serde_json::from_value(entry) {
            Ok(input) => input,
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed feed entry");
                continue;
            }
        };
        match validate_bill_input(input) {
            Ok(details) => bills.push(PendingBill::new(details)),
            Err(e) => warn!(index, error = %e, "Skipping invalid feed entry"),
        }
    }
    bills
}

/// Imports pending bills from a feed file.
///
/// Holds the shared persistence handle and locks it per step, so listings
/// keep being served while the feed is read. Must run on a blocking thread.
pub struct FeedRefresh {
    persistence: Arc<Mutex<Persistence>>,
    feed: Option<PathBuf>,
    policy: StalenessPolicy,
    imported: usize,
}

impl FeedRefresh {
    #[must_use]
    pub const fn new(
        persistence: Arc<Mutex<Persistence>>,
        feed: Option<PathBuf>,
        policy: StalenessPolicy,
    ) -> Self {
        Self {
            persistence,
            feed,
            policy,
            imported: 0,
        }
    }

    /// Number of bills queued by the last completed run.
    #[must_use]
    pub const fn imported(&self) -> usize {
        self.imported
    }

    fn import(&self) -> Result<usize, RefreshError> {
        let bills: Vec<PendingBill> = match &self.feed {
            None => {
                debug!("No feed configured, nothing to import");
                Vec::new()
            }
            Some(path) => parse_feed_entries(load_feed(path)?),
        };

        let mut imported: usize = 0;
        let mut persistence = self.persistence.blocking_lock();
        for mut bill in bills {
            match persistence.insert_pending_bill(&mut bill)? {
                PendingInsert::Inserted(pending_id) => {
                    debug!(pending_id, cbo_url = bill.details().cbo_url(), "Queued pending bill");
                    imported += 1;
                }
                PendingInsert::AlreadyKnown => {
                    debug!(cbo_url = bill.details().cbo_url(), "Bill already known, skipping");
                }
            }
        }
        Ok(imported)
    }
}

impl UpdateTask for FeedRefresh {
    type Error = RefreshError;

    fn should_run(&mut self) -> Result<bool, Self::Error> {
        let mut persistence = self.persistence.blocking_lock();
        Ok(should_run_update(
            &mut persistence,
            &self.policy,
            OffsetDateTime::now_utc(),
        )?)
    }

    fn run(&mut self) -> Result<(), Self::Error> {
        let run_id: i64 = self
            .persistence
            .blocking_lock()
            .begin_update_run(OffsetDateTime::now_utc())?;
        info!(run_id, "Update run started");

        match self.import() {
            Ok(imported) => {
                self.persistence.blocking_lock().complete_update_run(
                    run_id,
                    OffsetDateTime::now_utc(),
                    imported,
                )?;
                self.imported = imported;
                info!(run_id, imported, "Update run completed");
                Ok(())
            }
            Err(e) => {
                error!(run_id, error = %e, "Update run failed");
                if let Err(record_err) = self.persistence.blocking_lock().fail_update_run(
                    run_id,
                    OffsetDateTime::now_utc(),
                    &e.to_string(),
                ) {
                    warn!(run_id, error = %record_err, "Failed to record update run failure");
                }
                Err(e)
            }
        }
    }
}
