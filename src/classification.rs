use crate::audit;
use crate::config::ClassificationSource;
use crate::db;
use crate::error::Result;
use crate::legacy::{self, ClassificationRecord};
use crate::metadata;
use rusqlite::{Connection, OptionalExtension};
use serde_json::json;
use tracing::info;

/// Absolute code of the "Other Spaces" node the fixed space types hang from.
pub const OTHER_SPACES_CODE: &str = "11";
/// Room classification used when a legacy room has no code ("Apoio ao Ensino - Outros").
pub const DEFAULT_ROOM_CODE: &str = "3.6";

/// Stable tag deciding which metadata schema a classification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceType {
    Room,
    Campus,
    RoomSubdivision,
    Building,
    Floor,
}

impl SpaceType {
    pub const ALL: [SpaceType; 5] = [
        SpaceType::Room,
        SpaceType::Campus,
        SpaceType::RoomSubdivision,
        SpaceType::Building,
        SpaceType::Floor,
    ];

    /// Types with a fixed node under "Other Spaces", in creation order.
    pub const FIXED: [SpaceType; 4] = [
        SpaceType::Campus,
        SpaceType::RoomSubdivision,
        SpaceType::Building,
        SpaceType::Floor,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            SpaceType::Room => "room",
            SpaceType::Campus => "campus",
            SpaceType::RoomSubdivision => "room_subdivision",
            SpaceType::Building => "building",
            SpaceType::Floor => "floor",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// The `type` field of a legacy space record.
    pub fn from_record_type(kind: &str) -> Option<Self> {
        match kind {
            "Room" => Some(SpaceType::Room),
            "Campus" => Some(SpaceType::Campus),
            "RoomSubdivision" => Some(SpaceType::RoomSubdivision),
            "Building" => Some(SpaceType::Building),
            "Floor" => Some(SpaceType::Floor),
            _ => None,
        }
    }

    pub fn name_en(self) -> &'static str {
        match self {
            SpaceType::Room => "Room",
            SpaceType::Campus => "Campus",
            SpaceType::RoomSubdivision => "Room Subdivision",
            SpaceType::Building => "Building",
            SpaceType::Floor => "Floor",
        }
    }

    pub fn name_pt(self) -> &'static str {
        match self {
            SpaceType::Room => "Sala",
            SpaceType::Campus => "Campus",
            SpaceType::RoomSubdivision => "Subdivisão de Sala",
            SpaceType::Building => "Edifício",
            SpaceType::Floor => "Piso",
        }
    }

    fn local_code(self) -> Option<&'static str> {
        match self {
            SpaceType::Room => None,
            SpaceType::Campus => Some("3"),
            SpaceType::RoomSubdivision => Some("4"),
            SpaceType::Building => Some("5"),
            SpaceType::Floor => Some("6"),
        }
    }

    /// Absolute classification code for the non-room types.
    pub fn classification_code(self) -> Option<String> {
        self.local_code()
            .map(|c| format!("{}.{}", OTHER_SPACES_CODE, c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created { nodes: usize },
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct ClassificationRow {
    pub id: i64,
    pub absolute_code: String,
    pub name_pt: String,
    pub name_en: Option<String>,
    pub space_type: Option<SpaceType>,
}

/// Creates the classification tree unless one already exists.
pub fn ensure_classifications(
    conn: &Connection,
    source: &ClassificationSource,
) -> Result<BootstrapOutcome> {
    if db::root_classification_count(conn)? > 0 {
        info!("classifications already imported");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let mut nodes = 0usize;
    match source {
        ClassificationSource::Defaults => {
            info!("no classifications, create default classifications");
        }
        ClassificationSource::File(path) => {
            info!("no classifications, import classifications from {}", path.display());
            audit::log_input_digest(path)?;
            for rec in legacy::read_classifications(path)? {
                nodes += create_from_record(conn, None, &rec)?;
            }
        }
    }

    nodes += init_space_types(conn)?;
    assign_metadata_schemas(conn)?;
    Ok(BootstrapOutcome::Created { nodes })
}

fn create_from_record(
    conn: &Connection,
    parent: Option<&ParentRef>,
    rec: &ClassificationRecord,
) -> Result<usize> {
    let node = insert_node(
        conn,
        parent,
        &rec.code.to_string(),
        &rec.name,
        None,
        // Exported nodes carry Portuguese names only; the fixed types are retagged later.
        SpaceType::Room,
    )?;
    let mut created = 1;
    for child in &rec.childs {
        created += create_from_record(conn, Some(&node), child)?;
    }
    Ok(created)
}

struct ParentRef {
    id: i64,
    absolute_code: String,
}

fn insert_node(
    conn: &Connection,
    parent: Option<&ParentRef>,
    code: &str,
    name_pt: &str,
    name_en: Option<&str>,
    space_type: SpaceType,
) -> Result<ParentRef> {
    let absolute_code = match parent {
        Some(p) => format!("{}.{}", p.absolute_code, code),
        None => code.to_string(),
    };
    conn.execute(
        "INSERT INTO classifications(code, absolute_code, name_pt, name_en, parent_id, space_type)
         VALUES(?, ?, ?, ?, ?, ?)",
        (
            code,
            &absolute_code,
            name_pt,
            name_en,
            parent.map(|p| p.id),
            space_type.tag(),
        ),
    )?;
    Ok(ParentRef {
        id: conn.last_insert_rowid(),
        absolute_code,
    })
}

/// Ensures "Other Spaces" and the fixed space types beneath it. Nodes the export
/// already provided are retagged in place.
fn init_space_types(conn: &Connection) -> Result<usize> {
    info!("init space types");
    let mut created = 0usize;

    let other_spaces = match db::classification_id(conn, OTHER_SPACES_CODE)? {
        Some(id) => ParentRef {
            id,
            absolute_code: OTHER_SPACES_CODE.to_string(),
        },
        None => {
            created += 1;
            insert_node(
                conn,
                None,
                OTHER_SPACES_CODE,
                "Outros Espaços",
                Some("Other Spaces"),
                SpaceType::Room,
            )?
        }
    };

    for t in SpaceType::FIXED {
        let Some(code) = t.local_code() else {
            continue;
        };
        let absolute_code = format!("{}.{}", other_spaces.absolute_code, code);
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM classifications WHERE absolute_code = ?",
                [&absolute_code],
                |row| row.get(0),
            )
            .optional()?;
        match existing {
            Some(id) => {
                conn.execute(
                    "UPDATE classifications SET name_pt = ?, name_en = ?, space_type = ? WHERE id = ?",
                    (t.name_pt(), t.name_en(), t.tag(), id),
                )?;
            }
            None => {
                insert_node(
                    conn,
                    Some(&other_spaces),
                    code,
                    t.name_pt(),
                    Some(t.name_en()),
                    t,
                )?;
                created += 1;
            }
        }
    }
    Ok(created)
}

/// Replaces every node's metadata schema with the one for its space type.
pub fn assign_metadata_schemas(conn: &Connection) -> Result<()> {
    info!("init all classifications with metadata");
    let rows = list_classifications(conn)?;
    let mut ins = conn.prepare(
        "INSERT INTO classification_metadata_specs(
            classification_id, key, label_pt, label_en, value_type, required, default_value, sort_order)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?)",
    )?;
    for row in rows {
        let space_type = row.space_type.unwrap_or(SpaceType::Room);
        conn.execute(
            "DELETE FROM classification_metadata_specs WHERE classification_id = ?",
            [row.id],
        )?;
        for (i, spec) in metadata::schema_for(space_type).iter().enumerate() {
            ins.execute((
                row.id,
                spec.key,
                spec.label_pt,
                spec.label_en,
                spec.value_type.as_str(),
                spec.required,
                spec.default_value,
                i as i64,
            ))?;
        }
    }
    Ok(())
}

/// Every node, parents before children and siblings in numeric code order.
pub fn list_classifications(conn: &Connection) -> Result<Vec<ClassificationRow>> {
    let mut stmt = conn.prepare(
        "WITH RECURSIVE tree(id, sort_path) AS (
            SELECT id, printf('%010d', CAST(code AS INTEGER))
            FROM classifications WHERE parent_id IS NULL
            UNION ALL
            SELECT c.id, t.sort_path || '.' || printf('%010d', CAST(c.code AS INTEGER))
            FROM classifications c JOIN tree t ON c.parent_id = t.id
         )
         SELECT c.id, c.absolute_code, c.name_pt, c.name_en, c.space_type
         FROM tree t JOIN classifications c ON c.id = t.id
         ORDER BY t.sort_path",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let tag: String = row.get(4)?;
            Ok(ClassificationRow {
                id: row.get(0)?,
                absolute_code: row.get(1)?,
                name_pt: row.get(2)?,
                name_en: row.get(3)?,
                space_type: SpaceType::from_tag(&tag),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn log_tree(conn: &Connection) -> Result<()> {
    for row in list_classifications(conn)? {
        let mut name = json!({ "pt-PT": row.name_pt });
        if let Some(en) = &row.name_en {
            name["en-GB"] = json!(en);
        }
        info!("code {} name {}", row.absolute_code, name);
    }
    Ok(())
}
