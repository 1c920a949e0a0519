#![allow(dead_code)]

use rusqlite::Connection;
use spaces_migrate::db;
use spaces_migrate::oid::SPACE_DOMAIN_CLASS;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SPACE_CID: i64 = 570;

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, serde_json::to_vec_pretty(value).expect("encode json")).expect("write json");
    p
}

/// Oid of a migrated space with the given internal number.
pub fn space_oid(internal: i64) -> i64 {
    (SPACE_CID << 32) + internal
}

/// Legacy export id that translates to `space_oid(internal)`.
pub fn legacy_id(internal: i64) -> String {
    space_oid(internal).to_string()
}

/// Store with the space class registered, as left by the earlier migration phase.
pub fn seeded_store(dir: &Path) -> Connection {
    let conn = db::open_db(&dir.join("spaces.sqlite3")).expect("open store");
    conn.execute(
        "INSERT INTO ff_domain_class_info(domain_class_id, domain_class_name) VALUES(?, ?)",
        (SPACE_CID, SPACE_DOMAIN_CLASS),
    )
    .expect("seed catalog");
    conn
}

pub fn add_space(conn: &Connection, internal: i64) {
    conn.execute(
        "INSERT INTO spaces(oid, created_on) VALUES(?, '2000-01-01')",
        [space_oid(internal)],
    )
    .expect("insert space");
}

pub fn add_group(conn: &Connection, id: &str) {
    conn.execute(
        "INSERT INTO persistent_groups(id, expression) VALUES(?, ?)",
        (id, format!("members of {}", id)),
    )
    .expect("insert group");
}

pub fn add_classification(conn: &Connection, absolute_code: &str, parent: Option<i64>) -> i64 {
    let code = absolute_code.rsplit('.').next().unwrap_or(absolute_code);
    conn.execute(
        "INSERT INTO classifications(code, absolute_code, name_pt, parent_id, space_type)
         VALUES(?, ?, ?, ?, 'room')",
        (code, absolute_code, format!("Classe {}", absolute_code), parent),
    )
    .expect("insert classification");
    conn.last_insert_rowid()
}

pub fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("count")
}
