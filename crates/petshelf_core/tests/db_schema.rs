use petshelf_core::db::schema::SCHEMA_VERSION;
use petshelf_core::db::{open_db, open_db_in_memory, DbError};
use petshelf_core::{Gender, PetAddress, PetStore, PetValues, SqlitePetStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_pets_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "pets");
}

#[test]
fn reopening_same_database_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("petshelf.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES ('Tommy', 'Pomeranian', 1, 4);",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_eq!(pet_count(&conn), 1);
}

#[test]
fn older_database_is_destructively_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    // A file stamped below the current version, carrying an old-shape table
    // with data. The upgrade policy discards all of it.
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE pets (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             INSERT INTO pets (name) VALUES ('legacy row');",
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_eq!(pet_count(&conn), 0);

    // The rebuilt table has the full current shape and accepts writes.
    let store = SqlitePetStore::try_new(&conn).unwrap();
    let address = store
        .insert(
            &PetAddress::Collection,
            &PetValues::new_pet("Rex", None, Gender::Male, 3),
        )
        .unwrap();
    assert_eq!(address, PetAddress::Item(1));
}

#[test]
fn newer_database_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn pet_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
