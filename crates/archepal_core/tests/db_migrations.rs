use archepal_core::db::migrations::latest_version;
use archepal_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_schema_object(&conn, "table", "documents");
    assert_schema_object(&conn, "index", "idx_documents_collection_seq");
    assert_schema_object(&conn, "index", "idx_documents_artifact_site");
}

#[test]
fn reopening_a_file_store_keeps_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("archepal.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO documents (collection, id, body, created_at, updated_at)
         VALUES ('sites', 's1', '{}', 1, 1);",
        [],
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn document_ids_are_unique_per_collection() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO documents (collection, id, body, created_at, updated_at)
                  VALUES (?1, 'x', '{}', 0, 0);";
    conn.execute(insert, ["sites"]).unwrap();
    conn.execute(insert, ["artifacts"]).unwrap();
    assert!(conn.execute(insert, ["sites"]).is_err());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
