use crate::db;
use crate::error::{MigrationError, Result};
use crate::legacy::OccupationRecord;
use crate::oid::OidTranslator;
use crate::recurrence::{self, Recurrence};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

const STORED_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OccupationImportSummary {
    pub chunks: usize,
    pub created: usize,
    pub space_links: usize,
    pub with_request: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OccupationConfig {
    start: String,
    end: String,
    all_day: bool,
    #[serde(flatten)]
    recurrence: Recurrence,
    intervals: Vec<StoredInterval>,
}

#[derive(Debug, Serialize)]
struct StoredInterval {
    start: String,
    end: String,
}

fn stored(dt: NaiveDateTime) -> String {
    dt.format(STORED_DATE_TIME).to_string()
}

/// Creates one occupation per legacy record and links it to its spaces.
///
/// Unlike spaces, a reference to a space that was never migrated is fatal: the
/// occupation would otherwise be silently narrowed.
pub fn import_occupations(
    conn: &mut Connection,
    translator: &OidTranslator,
    records: &[OccupationRecord],
    chunk_size: usize,
) -> Result<OccupationImportSummary> {
    let chunk_size = chunk_size.max(1);
    let mut summary = OccupationImportSummary::default();
    info!(
        "processing occupations in chunks of {}, total : {}",
        chunk_size,
        records.len().div_ceil(chunk_size)
    );

    for chunk in records.chunks(chunk_size) {
        info!("occupation chunk with {}", chunk.len());
        let tx = conn.transaction()?;
        for rec in chunk {
            create_occupation(&tx, translator, rec, &mut summary)?;
        }
        tx.commit()?;
        summary.chunks += 1;
    }
    Ok(summary)
}

fn create_occupation(
    conn: &Connection,
    translator: &OidTranslator,
    rec: &OccupationRecord,
    summary: &mut OccupationImportSummary,
) -> Result<()> {
    let mut targets: Vec<i64> = Vec::new();
    for space_id in rec.spaces.iter().flatten() {
        let space_id = space_id.trim();
        if space_id.is_empty() {
            continue;
        }
        let oid = translator.new_space_oid(space_id)?;
        if !db::space_exists(conn, oid)? {
            return Err(MigrationError::MissingSpace(space_id.to_string()));
        }
        if !targets.contains(&oid) {
            targets.push(oid);
        }
    }

    let start = rec.start_date_time()?;
    let end = rec.end_date_time()?;
    let recurrence = recurrence::derive_recurrence(
        rec.frequency.as_deref(),
        start,
        rec.saturday.unwrap_or(false),
        rec.sunday.unwrap_or(false),
    )?;
    let intervals = rec
        .intervals()?
        .into_iter()
        .map(|(s, e)| StoredInterval {
            start: stored(s),
            end: stored(e),
        })
        .collect();
    let config = OccupationConfig {
        start: stored(start),
        end: stored(end),
        all_day: false,
        recurrence,
        intervals,
    };

    let mut request = rec.request.as_deref().map(str::trim).filter(|id| !id.is_empty());
    if let Some(id) = request {
        if !db::request_exists(conn, id)? {
            request = None;
        }
    }

    let occupation_id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO occupations(id, title, description, config, request_id)
         VALUES(?, ?, ?, ?, ?)",
        (
            &occupation_id,
            rec.title.as_deref(),
            rec.description.as_deref(),
            serde_json::to_string(&config)?,
            request,
        ),
    )?;

    let mut link = conn.prepare(
        "INSERT INTO occupation_spaces(occupation_id, space_oid) VALUES(?, ?)",
    )?;
    for oid in &targets {
        link.execute((&occupation_id, oid))?;
    }

    debug!(
        occupation = %occupation_id,
        spaces = targets.len(),
        "created occupation {:?}",
        rec.title
    );
    summary.created += 1;
    summary.space_links += targets.len();
    if request.is_some() {
        summary.with_request += 1;
    }
    Ok(())
}
