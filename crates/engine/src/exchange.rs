//! JSON import and export of the character collection.

use serde_json::Value;
use sheetkeep_domain::Character;

/// Suggested file name for an export download.
pub const EXPORT_FILE_NAME: &str = "dnd5e_characters.json";

/// Why an import was refused. The existing collection is never touched.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import failed: file is not valid JSON ({0})")]
    Malformed(#[source] serde_json::Error),

    #[error("Import failed: expected a list of characters")]
    NotAnArray,

    #[error("Import failed: the file contains no characters")]
    Empty,

    #[error("Import failed: character #{index} is invalid ({source})")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Pretty-printed JSON array of the full collection.
pub fn export_characters(characters: &[Character]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(characters)
}

/// Parses an import file into records, giving fresh ids to records without one.
pub fn parse_import(text: &str) -> Result<Vec<Character>, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::Malformed)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    if items.is_empty() {
        return Err(ImportError::Empty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut character: Character = serde_json::from_value(item)
                .map_err(|source| ImportError::Record { index, source })?;
            if character.ensure_id() {
                tracing::debug!(index, character_id = %character.id, "Assigned id to imported character");
            }
            Ok(character)
        })
        .collect()
}

/// Reads the stored collection, recovering from anything malformed.
///
/// Absent, unparseable or non-array data yields an empty collection. Records
/// that cannot be read are skipped with a warning.
pub fn parse_stored(text: Option<&str>) -> Vec<Character> {
    let Some(text) = text else {
        return Vec::new();
    };

    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("Stored characters are not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Stored characters are not valid JSON, starting empty: {}", e);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Character>(item) {
            Ok(mut character) => {
                character.ensure_id();
                Some(character)
            }
            Err(e) => {
                tracing::warn!(index, "Skipping unreadable stored character: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetkeep_domain::{CharacterClass, Skill};

    #[test]
    fn export_then_import_reproduces_collection() {
        let mut a = Character::create_default("Vex");
        a.class = Some(CharacterClass::Rogue);
        a.skills.set_proficient(Skill::Stealth, true);
        a.currency.gp = 25;
        let b = Character::create_default("Grog");

        let json = export_characters(&[a.clone(), b.clone()]).expect("export");
        assert!(json.starts_with("[\n"));

        let imported = parse_import(&json).expect("import");
        assert_eq!(imported, vec![a, b]);
    }

    #[test]
    fn missing_ids_are_assigned_and_kept() {
        let imported = parse_import(r#"[{"name":"A"},{"id":"","name":"B"},{"id":"keep","name":"C"}]"#)
            .expect("import");
        assert!(!imported[0].id.is_blank());
        assert!(!imported[1].id.is_blank());
        assert_ne!(imported[0].id, imported[1].id);
        assert_eq!(imported[2].id.as_str(), "keep");

        let again = parse_import(&export_characters(&imported).expect("export")).expect("import");
        assert_eq!(again, imported);
    }

    #[test]
    fn import_keeps_data_as_given() {
        // Three saves and no class defaults applied.
        let imported = parse_import(
            r#"[{"id":"x","class":"Rogue","savingThrows":{"str":true,"con":true,"wis":true}}]"#,
        )
        .expect("import");
        assert_eq!(imported[0].saving_throws.count(), 3);
        assert!(!imported[0].saving_throws.dexterity);
    }

    #[test]
    fn malformed_imports_are_rejected() {
        assert!(matches!(parse_import("{oops"), Err(ImportError::Malformed(_))));
        assert!(matches!(parse_import(r#"{"name":"A"}"#), Err(ImportError::NotAnArray)));
        assert!(matches!(parse_import("[]"), Err(ImportError::Empty)));
        assert!(matches!(
            parse_import(r#"[{"name":"A"},{"class":"Gunslinger"}]"#),
            Err(ImportError::Record { index: 1, .. })
        ));
        assert!(matches!(parse_import("[1]"), Err(ImportError::Record { index: 0, .. })));
    }

    #[test]
    fn stored_data_recovers_to_empty() {
        assert!(parse_stored(None).is_empty());
        assert!(parse_stored(Some("garbage")).is_empty());
        assert!(parse_stored(Some(r#"{"a":1}"#)).is_empty());
    }

    #[test]
    fn stored_data_skips_bad_records() {
        let stored = parse_stored(Some(r#"[{"name":"A"},{"class":"Gunslinger"},"x"]"#));
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "A");
        assert!(!stored[0].id.is_blank());
    }
}
