//! SQLite persistence for extracted skyline features.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError, Transaction};
use skyline_core::Feature;
use thiserror::Error;

/// Errors raised when persisting extracted features to SQLite.
#[derive(Debug, Error)]
pub enum PersistFeaturesError {
    /// Failed to create the parent directory for the SQLite artefact.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Switching the database to WAL journalling failed.
    #[error("failed to enable WAL journalling")]
    JournalMode {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin feature persistence transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the `features` table or its indexes failed.
    #[error("failed to create features schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing the insert statement failed.
    #[error("failed to prepare feature insert statement")]
    PrepareInsert {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a feature row failed.
    #[error("failed to persist {kind} feature {name:?}")]
    PersistRow {
        /// Category of the feature being persisted.
        kind: &'static str,
        /// Name of the feature being persisted (may be empty).
        name: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit feature persistence transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Checkpointing and vacuuming the finished database failed.
    #[error("failed to consolidate database")]
    Consolidate {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Persist extracted features into the region database at `path`.
///
/// Parent directories are created automatically and the `features` table
/// and its indexes are initialised if missing. Rows are appended in one
/// transaction; the database is built under WAL journalling and
/// checkpointed and vacuumed afterwards so the artefact ships as a single
/// consolidated file.
pub fn persist_features_to_sqlite(
    path: &Utf8Path,
    features: &[Feature],
) -> Result<(), PersistFeaturesError> {
    skyline_fs::ensure_parent_dir(path).map_err(|source| PersistFeaturesError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| PersistFeaturesError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .map_err(|source| PersistFeaturesError::JournalMode { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| PersistFeaturesError::BeginTransaction { source })?;
    create_schema(&transaction)?;
    persist_rows(&transaction, features)?;
    transaction
        .commit()
        .map_err(|source| PersistFeaturesError::Commit { source })?;

    // Checkpoint the WAL and reclaim free pages so the artefact is one file.
    connection
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE); VACUUM;")
        .map_err(|source| PersistFeaturesError::Consolidate { source })?;
    Ok(())
}

fn create_schema(transaction: &Transaction<'_>) -> Result<(), PersistFeaturesError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS features (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            type TEXT,
            height REAL,
            levels INTEGER,
            address TEXT,
            latitude REAL,
            longitude REAL
        )",
        "CREATE INDEX IF NOT EXISTS idx_features_lat_lon ON features(latitude, longitude)",
        "CREATE INDEX IF NOT EXISTS idx_features_type ON features(type)",
    ];
    for statement in statements {
        transaction
            .execute(statement, [])
            .map_err(|source| PersistFeaturesError::CreateSchema { source })?;
    }
    Ok(())
}

fn persist_rows(
    transaction: &Transaction<'_>,
    features: &[Feature],
) -> Result<(), PersistFeaturesError> {
    if features.is_empty() {
        return Ok(());
    }

    let mut statement = transaction
        .prepare(
            "INSERT INTO features (name, type, height, levels, address, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|source| PersistFeaturesError::PrepareInsert { source })?;

    for feature in features {
        statement
            .execute((
                &feature.name,
                feature.kind.as_str(),
                feature.height,
                feature.levels,
                &feature.address,
                feature.location.y,
                feature.location.x,
            ))
            .map_err(|source| PersistFeaturesError::PersistRow {
                kind: feature.kind.as_str(),
                name: feature.name.clone(),
                source,
            })?;
    }
    Ok(())
}
