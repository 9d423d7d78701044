use jotter_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use jotter_core::db::{open_db, open_db_in_memory, DbError};
use jotter_core::{RepoError, SqliteNoteRepository, Storage};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let storage = open_db_in_memory().unwrap();

    storage
        .with_connection(|conn| {
            assert_eq!(current_user_version(conn)?, latest_version());
            assert_table_exists(conn, "notes");
            Ok::<_, DbError>(())
        })
        .unwrap();
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let storage = open_db(&path).unwrap();
    storage
        .insert(
            "INSERT INTO notes (title, content, updated_at, created_at) VALUES (?1, ?2, 1, 1);",
            ["kept", "body"],
        )
        .unwrap();
    drop(storage);

    let storage = open_db(&path).unwrap();
    let titles = storage
        .query("SELECT title FROM notes;", [], |row| row.get::<_, String>(0))
        .unwrap();
    assert_eq!(titles, vec!["kept".to_string()]);
}

#[test]
fn apply_migrations_twice_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "notes");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).err().unwrap();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_database_in_missing_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("notes.sqlite3");

    let err = open_db(&path).err().unwrap();
    assert!(matches!(err, DbError::Unavailable { .. }), "got {err}");
    assert!(err.to_string().contains("notes.sqlite3"));
}

#[test]
fn repository_rejects_unmigrated_storage() {
    let storage = Storage::new(Connection::open_in_memory().unwrap());
    let err = SqliteNoteRepository::try_new(storage).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn repository_rejects_table_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, title TEXT, content TEXT);")
        .unwrap();
    let err = SqliteNoteRepository::try_new(Storage::new(conn))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "notes",
            column: "updated_at"
        }
    ));
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
