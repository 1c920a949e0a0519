use crate::access::AccessPolicy;
use crate::blueprint::{self, DateWindow};
use crate::classification::{SpaceType, DEFAULT_ROOM_CODE};
use crate::db;
use crate::error::{MigrationError, Result};
use crate::legacy::{self, InformationSnapshot, SpaceRecord};
use crate::metadata::{self, EXAM_CAPACITY};
use crate::oid::OidTranslator;
use rusqlite::Connection;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpaceImportSummary {
    pub chunks: usize,
    pub updated: usize,
    pub skipped_missing: usize,
    pub informations: usize,
}

/// Updates already-migrated spaces from their legacy records.
///
/// Each chunk of `chunk_size` records is applied in one transaction. The first
/// error rolls back the current chunk and ends the import; chunks committed
/// before it stay committed.
pub fn import_spaces(
    conn: &mut Connection,
    translator: &OidTranslator,
    records: &[SpaceRecord],
    chunk_size: usize,
) -> Result<SpaceImportSummary> {
    let chunk_size = chunk_size.max(1);
    let mut summary = SpaceImportSummary::default();
    info!(
        "processing chunks of {}, total : {}",
        chunk_size,
        records.len().div_ceil(chunk_size)
    );

    for chunk in records.chunks(chunk_size) {
        info!("chunk with {}", chunk.len());
        let tx = conn.transaction()?;
        for rec in chunk {
            process_record(&tx, translator, rec, &mut summary)?;
        }
        tx.commit()?;
        summary.chunks += 1;
    }

    Ok(summary)
}

fn process_record(
    conn: &Connection,
    translator: &OidTranslator,
    rec: &SpaceRecord,
    summary: &mut SpaceImportSummary,
) -> Result<()> {
    let oid = translator.new_space_oid(&rec.external_id)?;
    if !db::space_exists(conn, oid)? {
        warn!("space doesn't exist {}", rec.external_id);
        summary.skipped_missing += 1;
        return Ok(());
    }
    summary.informations += update_space(conn, oid, rec)?;
    summary.updated += 1;
    Ok(())
}

fn update_space(conn: &Connection, oid: i64, rec: &SpaceRecord) -> Result<usize> {
    let space_type = SpaceType::from_record_type(&rec.kind)
        .ok_or_else(|| MigrationError::UnknownSpaceType(rec.kind.clone()))?;

    let mut snapshots: Vec<(DateWindow, &InformationSnapshot)> =
        Vec::with_capacity(rec.informations.len());
    for info in &rec.informations {
        let window = DateWindow::parse(info.valid_from.as_deref(), info.valid_until.as_deref())?;
        snapshots.push((window, info));
    }
    // Oldest first so later snapshots supersede earlier ones.
    snapshots.sort_by_key(|(w, _)| w.from);

    let mut ins = conn.prepare(
        "INSERT INTO space_informations(
            space_oid, valid_from, valid_until, name, identification, blueprint_number,
            area, allocatable_capacity, classification_id, metadata, blueprint)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;
    for (window, info) in &snapshots {
        let classification_id =
            resolve_classification(conn, space_type, info.classification_code.as_deref())?;
        let mut values = metadata::build_metadata(space_type, info);
        if space_type == SpaceType::Room {
            if let Some(c) = rec.exam_capacity {
                values.insert(EXAM_CAPACITY.to_string(), c.to_string());
            }
        }
        let capacity = info.capacity.or(rec.normal_capacity);
        let raw_blueprint = blueprint::select_blueprint(window, &rec.blueprints)?;

        ins.execute((
            oid,
            window.from.map(|d| d.to_string()),
            window.until.map(|d| d.to_string()),
            info.name.as_deref(),
            info.identification.as_deref(),
            info.blueprint_number.as_deref(),
            info.area,
            capacity,
            classification_id,
            serde_json::to_string(&values)?,
            raw_blueprint,
        ))?;
    }

    let created_on = legacy::parse_optional_date(rec.created_on.as_deref())?;
    let occupations = AccessPolicy::union([
        valid_group(conn, rec.occupation_group.as_deref())?,
        valid_group(conn, rec.lesson_occupations_access_group.as_deref())?,
        valid_group(conn, rec.written_evaluation_occupations_access_group.as_deref())?,
    ]);
    let management = valid_group(conn, rec.management_space_group.as_deref())?;

    conn.execute(
        "UPDATE spaces SET
           created_on = COALESCE(?, created_on),
           occupations_access_group = ?,
           management_access_group = ?
         WHERE oid = ?",
        (
            created_on.map(|d| d.to_string()),
            occupations.to_expression(),
            management,
            oid,
        ),
    )?;
    debug!(oid, snapshots = snapshots.len(), "updated space {}", rec.external_id);

    Ok(snapshots.len())
}

/// Rooms carry their own (zero-padded) code; every other type maps to a fixed node.
pub fn resolve_classification(
    conn: &Connection,
    space_type: SpaceType,
    legacy_code: Option<&str>,
) -> Result<i64> {
    let code = match space_type.classification_code() {
        Some(code) => code,
        None => {
            let raw = legacy_code
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_ROOM_CODE);
            legacy::strip_leading_zeros(raw)
        }
    };
    db::classification_id(conn, &code)?.ok_or(MigrationError::MissingClassification(code))
}

fn valid_group<'a>(conn: &Connection, group_id: Option<&'a str>) -> Result<Option<&'a str>> {
    let Some(id) = group_id.map(str::trim).filter(|g| !g.is_empty()) else {
        return Ok(None);
    };
    if db::group_exists(conn, id)? {
        Ok(Some(id))
    } else {
        warn!("access group doesn't exist {}, ignored", id);
        Ok(None)
    }
}
