use crate::error::{MigrationError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One node of `classifications.json`. Names are Portuguese only.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRecord {
    pub code: i64,
    pub name: String,
    #[serde(default)]
    pub childs: Vec<ClassificationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceRecord {
    #[serde(default)]
    pub parent_external_id: Option<String>,
    pub external_id: String,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default)]
    pub exam_capacity: Option<i64>,
    #[serde(default)]
    pub normal_capacity: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub occupation_group: Option<String>,
    #[serde(default)]
    pub management_space_group: Option<String>,
    #[serde(default)]
    pub lesson_occupations_access_group: Option<String>,
    #[serde(default)]
    pub written_evaluation_occupations_access_group: Option<String>,
    #[serde(default)]
    pub informations: Vec<InformationSnapshot>,
    #[serde(default)]
    pub blueprints: Vec<BlueprintRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InformationSnapshot {
    pub capacity: Option<i64>,
    pub blueprint_number: Option<String>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub emails: Option<String>,
    pub age_quality: Option<bool>,
    pub area: Option<f64>,
    pub description: Option<String>,
    pub distance_from_sanitary_instalations_quality: Option<bool>,
    pub door_number: Option<String>,
    pub height_quality: Option<bool>,
    pub identification: Option<String>,
    pub illumination_quality: Option<bool>,
    pub observations: Option<String>,
    pub security_quality: Option<bool>,
    pub classification_code: Option<String>,
    pub name: Option<String>,
    /// Exported but unused: a floor's level metadata is its name.
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintRecord {
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub creation_person: Option<String>,
    pub raw: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntervalRecord {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationRecord {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    pub begin_date: String,
    pub end_date: String,
    pub begin_time: String,
    pub end_time: String,
    #[serde(default)]
    pub saturday: Option<bool>,
    #[serde(default)]
    pub sunday: Option<bool>,
    #[serde(default)]
    pub intervals: Vec<IntervalRecord>,
    #[serde(default)]
    pub spaces: Vec<Option<String>>,
    #[serde(default)]
    pub request: Option<String>,
}

impl OccupationRecord {
    pub fn start_date_time(&self) -> Result<NaiveDateTime> {
        parse_date_time(&format!("{} {}", self.begin_date, self.begin_time))
    }

    pub fn end_date_time(&self) -> Result<NaiveDateTime> {
        parse_date_time(&format!("{} {}", self.end_date, self.end_time))
    }

    pub fn intervals(&self) -> Result<Vec<(NaiveDateTime, NaiveDateTime)>> {
        self.intervals
            .iter()
            .map(|i| Ok((parse_date_time(&i.start)?, parse_date_time(&i.end)?)))
            .collect()
    }
}

pub fn read_classifications(path: &Path) -> Result<Vec<ClassificationRecord>> {
    read_json_list(path)
}

pub fn read_spaces(path: &Path) -> Result<Vec<SpaceRecord>> {
    read_json_list(path)
}

pub fn read_occupations(path: &Path) -> Result<Vec<OccupationRecord>> {
    read_json_list(path)
}

fn read_json_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = std::fs::read(path).map_err(|source| MigrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| MigrationError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| MigrationError::BadDate {
        value: s.to_string(),
        format: DATE_FORMAT,
    })
}

/// Absent or blank dates are open bounds.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date(v).map(Some),
    }
}

pub fn parse_date_time(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), DATE_TIME_FORMAT).map_err(|_| {
        MigrationError::BadDate {
            value: s.to_string(),
            format: DATE_TIME_FORMAT,
        }
    })
}

/// Legacy classification codes pad segments with one leading zero ("03.06").
pub fn strip_leading_zeros(code: &str) -> String {
    code.split('.')
        .map(|part| part.strip_prefix('0').unwrap_or(part))
        .collect::<Vec<_>>()
        .join(".")
}
