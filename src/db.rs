use crate::error::{MigrationError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| MigrationError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS ff_domain_class_info(
            domain_class_id INTEGER NOT NULL,
            domain_class_name TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS classifications(
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL,
            absolute_code TEXT NOT NULL UNIQUE,
            name_pt TEXT NOT NULL,
            name_en TEXT,
            parent_id INTEGER,
            space_type TEXT NOT NULL,
            FOREIGN KEY(parent_id) REFERENCES classifications(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_classifications_parent ON classifications(parent_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS classification_metadata_specs(
            classification_id INTEGER NOT NULL,
            key TEXT NOT NULL,
            label_pt TEXT NOT NULL,
            label_en TEXT NOT NULL,
            value_type TEXT NOT NULL,
            required INTEGER NOT NULL,
            default_value TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            PRIMARY KEY(classification_id, key),
            FOREIGN KEY(classification_id) REFERENCES classifications(id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS spaces(
            oid INTEGER PRIMARY KEY,
            parent_oid INTEGER,
            created_on TEXT
        )",
        [],
    )?;
    // Spaces come from an earlier migration phase whose store may predate access groups.
    ensure_spaces_access_groups(conn)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS space_informations(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            space_oid INTEGER NOT NULL,
            valid_from TEXT,
            valid_until TEXT,
            name TEXT,
            identification TEXT,
            blueprint_number TEXT,
            area REAL,
            allocatable_capacity INTEGER,
            classification_id INTEGER NOT NULL,
            metadata TEXT NOT NULL,
            blueprint BLOB,
            FOREIGN KEY(space_oid) REFERENCES spaces(oid),
            FOREIGN KEY(classification_id) REFERENCES classifications(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_space_informations_space ON space_informations(space_oid)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS persistent_groups(
            id TEXT PRIMARY KEY,
            expression TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS occupation_requests(
            id TEXT PRIMARY KEY,
            subject TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS occupations(
            id TEXT PRIMARY KEY,
            title TEXT,
            description TEXT,
            config TEXT NOT NULL,
            request_id TEXT,
            FOREIGN KEY(request_id) REFERENCES occupation_requests(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS occupation_spaces(
            occupation_id TEXT NOT NULL,
            space_oid INTEGER NOT NULL,
            PRIMARY KEY(occupation_id, space_oid),
            FOREIGN KEY(occupation_id) REFERENCES occupations(id),
            FOREIGN KEY(space_oid) REFERENCES spaces(oid)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_occupation_spaces_space ON occupation_spaces(space_oid)",
        [],
    )?;

    Ok(())
}

fn ensure_spaces_access_groups(conn: &Connection) -> Result<()> {
    if !table_has_column(conn, "spaces", "occupations_access_group")? {
        conn.execute(
            "ALTER TABLE spaces ADD COLUMN occupations_access_group TEXT",
            [],
        )?;
    }
    if !table_has_column(conn, "spaces", "management_access_group")? {
        conn.execute(
            "ALTER TABLE spaces ADD COLUMN management_access_group TEXT",
            [],
        )?;
    }
    Ok(())
}

pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn domain_class_id(conn: &Connection, class_name: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT domain_class_id FROM ff_domain_class_info WHERE domain_class_name = ?",
            [class_name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

pub fn classification_id(conn: &Connection, absolute_code: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM classifications WHERE absolute_code = ?",
            [absolute_code],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

pub fn root_classification_count(conn: &Connection) -> Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM classifications WHERE parent_id IS NULL",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(n)
}

pub fn space_exists(conn: &Connection, oid: i64) -> Result<bool> {
    exists(conn, "SELECT 1 FROM spaces WHERE oid = ?", oid)
}

pub fn group_exists(conn: &Connection, id: &str) -> Result<bool> {
    exists(conn, "SELECT 1 FROM persistent_groups WHERE id = ?", id)
}

pub fn request_exists(conn: &Connection, id: &str) -> Result<bool> {
    exists(conn, "SELECT 1 FROM occupation_requests WHERE id = ?", id)
}

fn exists<P: rusqlite::ToSql>(conn: &Connection, sql: &str, key: P) -> Result<bool> {
    let found = conn
        .query_row(sql, [key], |_| Ok(()))
        .optional()?
        .is_some();
    Ok(found)
}
