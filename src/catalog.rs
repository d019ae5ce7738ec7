use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::card_matcher::{canonical_name, closest_name};
use crate::error::CatalogError;
use crate::models::card::{CatalogRecord, ReferenceCard};

/// Columns every catalog record must carry at the top level.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "layout", "set_type", "color_identity"];

/// Columns that live either at the top level or on each face of a
/// multi-face record.
pub const FACE_COLUMNS: [&str; 2] = ["mana_cost", "type_line"];

const EXCLUDED_LAYOUTS: [&str; 8] = [
    "art_series",
    "token",
    "double_faced_token",
    "emblem",
    "planar",
    "scheme",
    "vanguard",
    "reversible_card",
];

const EXCLUDED_SET_TYPES: [&str; 2] = ["funny", "memorabilia"];

/// Read-only lookup of card metadata by canonical name.
#[derive(Debug, Default)]
pub struct ReferenceCardCatalog {
    cards: HashMap<String, Arc<ReferenceCard>>,
}

impl ReferenceCardCatalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        info!("Loading card catalog from {}", path.display());
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, CatalogError> {
        let records: Vec<Value> = serde_json::from_str(data)?;
        Self::from_values(records)
    }

    /// Drops unplayable layouts and joke sets, then validates every kept
    /// record against the column contract before any card is admitted.
    pub fn from_values(records: Vec<Value>) -> Result<Self, CatalogError> {
        let total = records.len();
        let mut kept = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            if is_playable(index, &record)? {
                validate_record(index, &record)?;
                kept.push((index, record));
            }
        }

        let mut cards = HashMap::new();
        for (index, value) in kept {
            let record: CatalogRecord =
                serde_json::from_value(value).map_err(|e| CatalogError::Schema {
                    index,
                    reason: e.to_string(),
                })?;

            let card = ReferenceCard::from_record(record);
            cards.entry(card.name.clone()).or_insert_with(|| Arc::new(card));
        }

        info!("Loaded {} playable cards out of {} records", cards.len(), total);
        Ok(ReferenceCardCatalog { cards })
    }

    /// Looks up a card by any of its printed name forms.
    pub fn get(&self, name: &str) -> Option<Arc<ReferenceCard>> {
        self.cards.get(&canonical_name(name)).cloned()
    }

    /// Closest known name, used to hint at typos in unresolved rows.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        closest_name(&canonical_name(name), self.cards.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn validate_record(index: usize, record: &Value) -> Result<(), CatalogError> {
    let schema_error = |reason: String| CatalogError::Schema { index, reason };

    let object = record
        .as_object()
        .ok_or_else(|| schema_error("record is not an object".to_string()))?;

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|col| !object.contains_key(**col)) {
        return Err(schema_error(format!("missing column {missing:?}")));
    }

    let faces = object.get("card_faces").and_then(Value::as_array);
    for column in FACE_COLUMNS {
        let on_faces = faces.map_or(false, |faces| {
            !faces.is_empty() && faces.iter().all(|face| face.get(column).is_some())
        });
        if !object.contains_key(column) && !on_faces {
            debug!("record {} lacks {}: {:?}", index, column, object.get("name"));
            return Err(schema_error(format!("missing column {column:?}")));
        }
    }

    Ok(())
}

fn is_playable(index: usize, record: &Value) -> Result<bool, CatalogError> {
    let layout = str_column(index, record, "layout")?;
    let set_type = str_column(index, record, "set_type")?;
    Ok(!EXCLUDED_LAYOUTS.contains(&layout) && !EXCLUDED_SET_TYPES.contains(&set_type))
}

fn str_column<'a>(index: usize, record: &'a Value, column: &str) -> Result<&'a str, CatalogError> {
    record
        .get(column)
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::Schema {
            index,
            reason: format!("missing column {column:?}"),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const SAMPLE_CATALOG: &str = r#"[
        {"name": "Island", "layout": "normal", "set_type": "core", "color_identity": ["U"],
         "colors": [], "mana_cost": "", "cmc": 0.0, "type_line": "Basic Land — Island",
         "oracle_text": "({T}: Add {U}.)"},
        {"name": "Swamp", "layout": "normal", "set_type": "core", "color_identity": ["B"],
         "colors": [], "mana_cost": "", "cmc": 0.0, "type_line": "Basic Land — Swamp",
         "oracle_text": "({T}: Add {B}.)"},
        {"name": "Mountain", "layout": "normal", "set_type": "core", "color_identity": ["R"],
         "colors": [], "mana_cost": "", "cmc": 0.0, "type_line": "Basic Land — Mountain",
         "oracle_text": "({T}: Add {R}.)"},
        {"name": "Sheoldred, the Apocalypse", "layout": "normal", "set_type": "expansion",
         "color_identity": ["B"], "colors": ["B"], "mana_cost": "{2}{B}{B}", "cmc": 4.0,
         "type_line": "Legendary Creature — Phyrexian Praetor", "oracle_text": "Deathtouch"},
        {"name": "Counterspell", "layout": "normal", "set_type": "masters",
         "color_identity": ["U"], "colors": ["U"], "mana_cost": "{U}{U}", "cmc": 2.0,
         "type_line": "Instant", "oracle_text": "Counter target spell."},
        {"name": "Lightning Bolt", "layout": "normal", "set_type": "masters",
         "color_identity": ["R"], "colors": ["R"], "mana_cost": "{R}", "cmc": 1.0,
         "type_line": "Instant", "oracle_text": "Lightning Bolt deals 3 damage to any target."},
        {"name": "Fire // Ice", "layout": "split", "set_type": "masters",
         "color_identity": ["U", "R"], "colors": ["U", "R"], "mana_cost": "{1}{R} // {1}{U}",
         "cmc": 4.0, "type_line": "Instant // Instant",
         "card_faces": [
            {"name": "Fire", "mana_cost": "{1}{R}", "type_line": "Instant",
             "oracle_text": "Fire deals 2 damage divided as you choose."},
            {"name": "Ice", "mana_cost": "{1}{U}", "type_line": "Instant",
             "oracle_text": "Tap target permanent. Draw a card."}
         ]},
        {"name": "Goblin Guide", "layout": "normal", "set_type": "masters",
         "color_identity": ["R"], "colors": ["R"], "mana_cost": "{R}", "cmc": 1.0,
         "type_line": "Creature — Goblin Scout", "oracle_text": "Haste"},
        {"name": "Goblin", "layout": "token", "set_type": "token", "color_identity": ["R"],
         "colors": ["R"], "mana_cost": "", "type_line": "Token Creature — Goblin"},
        {"name": "Cheatyface", "layout": "normal", "set_type": "funny", "color_identity": ["U"],
         "colors": ["U"], "mana_cost": "{U}{U}{U}", "type_line": "Creature — Efreet"}
    ]"#;

    pub(crate) fn sample_catalog() -> ReferenceCardCatalog {
        ReferenceCardCatalog::from_json_str(SAMPLE_CATALOG).unwrap()
    }

    #[test]
    fn test_load_filters_unplayable_records() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.get("Goblin").is_none());
        assert!(catalog.get("Cheatyface").is_none());
        assert!(catalog.get("Goblin Guide").is_some());
    }

    #[test]
    fn test_split_card_canonical_lookup() {
        let catalog = sample_catalog();
        let fire = catalog.get("Fire // Ice").unwrap();
        assert_eq!(fire.name, "Fire");
        assert_eq!(fire.full_name, "Fire // Ice");
        assert_eq!(fire.mana_cost.as_deref(), Some("{1}{R}"));
        assert_eq!(fire.back.as_ref().unwrap().name, "Ice");
        assert_eq!(catalog.get("Fire"), Some(fire));
    }

    #[test]
    fn test_lookup_ignores_commas() {
        let catalog = sample_catalog();
        let sheoldred = catalog.get("Sheoldred the Apocalypse").unwrap();
        assert_eq!(sheoldred.full_name, "Sheoldred, the Apocalypse");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let data = r#"[
            {"name": "Island", "layout": "normal", "set_type": "core", "color_identity": ["U"],
             "mana_cost": "", "type_line": "Basic Land — Island"},
            {"name": "Opt", "layout": "normal", "color_identity": ["U"],
             "mana_cost": "{U}", "type_line": "Instant"}
        ]"#;
        let err = ReferenceCardCatalog::from_json_str(data).unwrap_err();
        match err {
            CatalogError::Schema { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("set_type"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_excluded_records_skip_column_checks() {
        let data = r#"[
            {"name": "Island", "layout": "normal", "set_type": "core", "color_identity": ["U"],
             "mana_cost": "", "type_line": "Basic Land — Island"},
            {"name": "Island Art Card", "layout": "art_series", "set_type": "memorabilia",
             "color_identity": []},
            {"name": "Goblin", "layout": "token", "set_type": "token"}
        ]"#;
        let catalog = ReferenceCardCatalog::from_json_str(data).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Island").is_some());
    }

    #[test]
    fn test_face_columns_may_live_on_faces() {
        let data = r#"[
            {"name": "Brazen Borrower // Petty Theft", "layout": "adventure",
             "set_type": "expansion", "color_identity": ["U"],
             "card_faces": [
                {"name": "Brazen Borrower", "mana_cost": "{1}{U}{U}",
                 "type_line": "Creature — Faerie Rogue"},
                {"name": "Petty Theft", "mana_cost": "{1}{U}",
                 "type_line": "Instant — Adventure"}
             ]}
        ]"#;
        let catalog = ReferenceCardCatalog::from_json_str(data).unwrap();
        let card = catalog.get("Brazen Borrower").unwrap();
        assert_eq!(card.colors.len(), 1);
        assert_eq!(card.mana_value, Some(3.0));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE_CATALOG).unwrap();
        let catalog = ReferenceCardCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 8);

        let missing = ReferenceCardCatalog::load(Path::new("/nonexistent/oracle-cards.json"));
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_suggest() {
        let catalog = sample_catalog();
        assert_eq!(catalog.suggest("Lightning Blot"), Some("Lightning Bolt"));
    }
}
