use crate::classification::SpaceType;
use crate::legacy::InformationSnapshot;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Boolean,
    Integer,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFieldSpec {
    pub key: &'static str,
    pub label_pt: &'static str,
    pub label_en: &'static str,
    pub value_type: ValueType,
    pub required: bool,
    pub default_value: &'static str,
}

const fn field(
    key: &'static str,
    label_pt: &'static str,
    label_en: &'static str,
    value_type: ValueType,
    required: bool,
    default_value: &'static str,
) -> MetadataFieldSpec {
    MetadataFieldSpec {
        key,
        label_pt,
        label_en,
        value_type,
        required,
        default_value,
    }
}

pub const EXAM_CAPACITY: &str = "examCapacity";

// Key spellings match what the target application already reads.
const ROOM_SCHEMA: &[MetadataFieldSpec] = &[
    field("observations", "Observações", "Observations", ValueType::String, false, ""),
    field("description", "Descrição", "Description", ValueType::String, false, ""),
    field("ageQualitity", "Qualidade em idade", "Age Quality", ValueType::Boolean, true, "false"),
    field(
        "distanceFromSanitaryInstalationsQuality",
        "Qualidade na distância às instalações sanitárias",
        "Distance From Sanitary Instalations Quality",
        ValueType::Boolean,
        true,
        "false",
    ),
    field("heightQuality", "Qualidade em altura", "Height Quality", ValueType::Boolean, true, "false"),
    field(
        "illuminationQuality",
        "Qualidade em iluminação",
        "Illumination Quality",
        ValueType::Boolean,
        true,
        "false",
    ),
    field("securityQuality", "Qualidade em segurança", "Security Quality", ValueType::Boolean, true, "false"),
    field("doorNumber", "Número Porta", "Door Number", ValueType::String, false, ""),
    field(EXAM_CAPACITY, "Capacidade Exame", "Exam Capacity", ValueType::Integer, true, "0"),
];

const FLOOR_SCHEMA: &[MetadataFieldSpec] = &[field("level", "Piso", "Level", ValueType::Integer, true, "0")];

pub fn schema_for(space_type: SpaceType) -> &'static [MetadataFieldSpec] {
    match space_type {
        SpaceType::Room => ROOM_SCHEMA,
        SpaceType::Floor => FLOOR_SCHEMA,
        SpaceType::Campus | SpaceType::RoomSubdivision | SpaceType::Building => &[],
    }
}

/// Metadata values for one information snapshot of a space of the given type.
///
/// Quality flags default to `"false"`; free-text fields are left out when the
/// legacy value is null. `examCapacity` lives on the space record, not the
/// snapshot, and is added by the space importer.
pub fn build_metadata(space_type: SpaceType, info: &InformationSnapshot) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    match space_type {
        SpaceType::Room => {
            put_text(&mut metadata, "observations", info.observations.as_deref());
            put_text(&mut metadata, "description", info.description.as_deref());
            put_flag(&mut metadata, "ageQualitity", info.age_quality);
            put_flag(
                &mut metadata,
                "distanceFromSanitaryInstalationsQuality",
                info.distance_from_sanitary_instalations_quality,
            );
            put_flag(&mut metadata, "heightQuality", info.height_quality);
            put_flag(&mut metadata, "illuminationQuality", info.illumination_quality);
            put_flag(&mut metadata, "securityQuality", info.security_quality);
            put_text(&mut metadata, "doorNumber", info.door_number.as_deref());
        }
        SpaceType::Floor => {
            // A floor's name is its level; the export's own `level` is not used.
            put_text(&mut metadata, "level", info.name.as_deref());
        }
        SpaceType::Campus | SpaceType::RoomSubdivision | SpaceType::Building => {}
    }
    metadata
}

fn put_text(metadata: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        metadata.insert(key.to_string(), v.to_string());
    }
}

fn put_flag(metadata: &mut BTreeMap<String, String>, key: &str, value: Option<bool>) {
    metadata.insert(key.to_string(), value.unwrap_or(false).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn schema_keys_are_unique() {
        for t in SpaceType::ALL {
            let keys: HashSet<&str> = schema_for(t).iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), schema_for(t).len(), "{:?}", t);
        }
    }

    #[test]
    fn only_room_and_floor_carry_fields() {
        assert_eq!(schema_for(SpaceType::Room).len(), 9);
        assert_eq!(schema_for(SpaceType::Floor)[0].key, "level");
        assert!(schema_for(SpaceType::Campus).is_empty());
        assert!(schema_for(SpaceType::Building).is_empty());
        assert!(schema_for(SpaceType::RoomSubdivision).is_empty());
    }

    #[test]
    fn room_metadata_defaults_flags_and_skips_null_text() {
        let info = InformationSnapshot {
            age_quality: Some(true),
            door_number: Some("12A".into()),
            ..Default::default()
        };
        let m = build_metadata(SpaceType::Room, &info);
        assert_eq!(m.get("ageQualitity").map(String::as_str), Some("true"));
        assert_eq!(m.get("securityQuality").map(String::as_str), Some("false"));
        assert_eq!(m.get("doorNumber").map(String::as_str), Some("12A"));
        assert!(!m.contains_key("observations"));
        assert!(!m.contains_key("level"));
        let schema_keys: HashSet<&str> = schema_for(SpaceType::Room).iter().map(|f| f.key).collect();
        assert!(m.keys().all(|k| schema_keys.contains(k.as_str())));
    }

    #[test]
    fn floor_level_is_the_snapshot_name() {
        let info = InformationSnapshot {
            name: Some("2".into()),
            ..Default::default()
        };
        let m = build_metadata(SpaceType::Floor, &info);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("level").map(String::as_str), Some("2"));

        let info = InformationSnapshot {
            name: Some("Piso 2".into()),
            level: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(
            build_metadata(SpaceType::Floor, &info).get("level").map(String::as_str),
            Some("Piso 2")
        );

        let info = InformationSnapshot {
            level: Some("2".into()),
            ..Default::default()
        };
        assert!(build_metadata(SpaceType::Floor, &info).is_empty());
    }

    #[test]
    fn building_metadata_is_empty() {
        let info = InformationSnapshot {
            observations: Some("ignored".into()),
            ..Default::default()
        };
        assert!(build_metadata(SpaceType::Building, &info).is_empty());
    }
}
