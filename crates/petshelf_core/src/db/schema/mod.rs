//! Physical `pets` schema and its version policy.
//!
//! # Responsibility
//! - Own the `pets` DDL and the single schema version number.
//! - Bring any connection to the current schema before use.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Upgrades are destructive: an older on-disk version is dropped and
//!   recreated, discarding all rows. There is no data-preserving path.
//! - A newer on-disk version is rejected, never downgraded.

use crate::db::{DbError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

/// Schema version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const CREATE_PETS_TABLE: &str = include_str!("pets.sql");
const DROP_PETS_TABLE: &str = "DROP TABLE IF EXISTS pets;";

/// Brings the connection to [`SCHEMA_VERSION`].
///
/// - Fresh database (`user_version = 0`): creates the `pets` table.
/// - Current version: no-op.
/// - Older version: drops and recreates the table. All rows are lost.
/// - Newer version: fails with [`DbError::UnsupportedSchemaVersion`].
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    // The version check and the rebuild must be one atomic unit, or two
    // connections racing on a fresh file would both run the DDL.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let db_version = current_user_version(&tx)?;

    if db_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if db_version < SCHEMA_VERSION {
        // Below the current version the table is rebuilt from scratch,
        // whatever shape the file carried before.
        tx.execute_batch(DROP_PETS_TABLE)?;
        tx.execute_batch(CREATE_PETS_TABLE)?;
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
