//! Roster - the explicit application state.
//!
//! Owns the character collection, the active id and the settings, and runs
//! each edit through the rules core before persisting. Every operation is a
//! synchronous mutate-then-persist cycle.

use serde::Serialize;
use sheetkeep_domain::{
    apply_update, Character, CharacterId, CharacterUpdate, ConstraintModel, ConstraintViolation,
    DerivedModel, Dnd5eSystem, DomainError, EditWarning, GameSystem, SheetSettings,
};

use crate::exchange::{self, ImportError};
use crate::infrastructure::{storage_keys, StorageProvider};

/// Errors from roster operations. None of them change the collection.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// A value produced by an operation plus whether it reached storage.
///
/// A failed write does not undo the in-memory change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persisted<T> {
    pub value: T,
    pub persisted: bool,
}

/// Result of an accepted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub warning: Option<EditWarning>,
    pub persisted: bool,
}

/// Derived and constraint models of the active record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub derived: DerivedModel,
    pub constraints: ConstraintModel,
}

pub struct Roster<S: StorageProvider> {
    storage: S,
    system: Dnd5eSystem,
    characters: Vec<Character>,
    active_id: CharacterId,
    settings: SheetSettings,
}

impl<S: StorageProvider> Roster<S> {
    /// Load both keys from storage.
    ///
    /// Malformed data falls back to an empty collection and default settings.
    /// An empty collection gets one default record, which is saved.
    pub fn load(storage: S) -> Self {
        let characters = exchange::parse_stored(storage.load(storage_keys::CHARACTERS).as_deref());
        let settings = match storage.load(storage_keys::SETTINGS) {
            None => SheetSettings::default(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Stored settings are not valid, using defaults: {}", e);
                SheetSettings::default()
            }),
        };

        let mut roster = Self {
            storage,
            system: Dnd5eSystem::new(),
            active_id: characters
                .first()
                .map(|c| c.id.clone())
                .unwrap_or_default(),
            characters,
            settings,
        };
        tracing::info!(count = roster.characters.len(), "Loaded characters");

        if roster.characters.is_empty() {
            roster.create("");
        }
        roster
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn settings(&self) -> SheetSettings {
        self.settings
    }

    pub fn active_id(&self) -> &CharacterId {
        &self.active_id
    }

    pub fn system(&self) -> &dyn GameSystem {
        &self.system
    }

    /// The active record. The roster is never empty, so this always resolves;
    /// a stale id falls back to the first record.
    pub fn active(&self) -> &Character {
        let index = self.active_index().unwrap_or(0);
        &self.characters[index]
    }

    fn active_index(&self) -> Option<usize> {
        self.characters.iter().position(|c| c.id == self.active_id)
    }

    fn active_mut(&mut self) -> &mut Character {
        let index = self.active_index().unwrap_or(0);
        &mut self.characters[index]
    }

    /// Append a default record and make it active.
    pub fn create(&mut self, name: &str) -> Persisted<CharacterId> {
        let character = Character::create_default(name);
        let id = character.id.clone();
        tracing::info!(character_id = %id, name = %character.name, "Created character");

        self.characters.push(character);
        self.active_id = id.clone();
        Persisted {
            value: id,
            persisted: self.persist_characters(),
        }
    }

    /// Switch the active record.
    pub fn select(&mut self, id: &CharacterId) -> Result<(), RosterError> {
        if !self.characters.iter().any(|c| &c.id == id) {
            return Err(DomainError::not_found("Character", id.as_str()).into());
        }
        self.active_id = id.clone();
        tracing::debug!(character_id = %id, "Selected character");
        Ok(())
    }

    /// Copy the active record, append the copy and make it active.
    pub fn duplicate_active(&mut self) -> Persisted<CharacterId> {
        let copy = self.active().duplicate();
        let id = copy.id.clone();
        tracing::info!(source_id = %self.active().id, character_id = %id, "Duplicated character");

        self.characters.push(copy);
        self.active_id = id.clone();
        Persisted {
            value: id,
            persisted: self.persist_characters(),
        }
    }

    /// Remove the active record. The first remaining record becomes active,
    /// or a fresh default one when none remain. Returns the removed id.
    pub fn delete_active(&mut self) -> Persisted<CharacterId> {
        let index = self.active_index().unwrap_or(0);
        let removed = self.characters.remove(index);
        tracing::info!(character_id = %removed.id, "Deleted character");

        let persisted = match self.characters.first() {
            Some(first) => {
                self.active_id = first.id.clone();
                self.persist_characters()
            }
            None => self.create("").persisted,
        };
        Persisted {
            value: removed.id,
            persisted,
        }
    }

    /// Forget every stored character and start over with one default record.
    pub fn reset_all(&mut self) -> Persisted<CharacterId> {
        let removed = match self.storage.remove(storage_keys::CHARACTERS) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to clear stored characters: {}", e);
                false
            }
        };
        tracing::info!(count = self.characters.len(), "Reset all characters");

        self.characters.clear();
        let created = self.create("");
        Persisted {
            value: created.value,
            persisted: removed && created.persisted,
        }
    }

    /// Validate, apply and persist one edit to the active record.
    pub fn apply(&mut self, update: CharacterUpdate) -> Result<EditOutcome, RosterError> {
        let settings = self.settings;
        let system = self.system;
        let character = self.active_mut();
        let id = character.id.clone();

        let warning = apply_update(character, update, system.class_rules(), &settings)
            .inspect_err(|e| tracing::debug!(character_id = %id, "Edit rejected: {}", e))?;
        if let Some(w) = &warning {
            tracing::debug!(character_id = %id, "Edit applied with warning: {}", w);
        }

        Ok(EditOutcome {
            warning,
            persisted: self.persist_characters(),
        })
    }

    /// Update and persist the class override setting.
    pub fn set_allow_class_override(&mut self, allow: bool) -> bool {
        self.settings = SheetSettings::with_class_override(allow);
        tracing::info!(allow_class_override = allow, "Updated settings");

        let saved = serde_json::to_string(&self.settings)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .save(storage_keys::SETTINGS, &json)
                    .map_err(|e| e.to_string())
            });
        match saved {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save settings: {}", e);
                false
            }
        }
    }

    /// Derived and constraint models for the active record.
    ///
    /// Class defaults are applied first unless the override is on; if that
    /// changes the record it is persisted.
    pub fn view(&mut self) -> SheetView {
        if !self.settings.allow_class_override {
            let system = self.system;
            if self.active_mut().apply_class_defaults(system.class_rules()) {
                tracing::debug!(character_id = %self.active_id, "Applied class saving throws");
                self.persist_characters();
            }
        }

        let character = self.active();
        SheetView {
            derived: DerivedModel::compute(character, self.system.calculation_engine()),
            constraints: ConstraintModel::evaluate(
                character,
                self.system.class_rules(),
                &self.settings,
            ),
        }
    }

    /// Pretty-printed JSON array of the whole collection.
    pub fn export_json(&self) -> Result<String, RosterError> {
        Ok(exchange::export_characters(&self.characters)?)
    }

    /// Replace the collection with the records in `text`.
    ///
    /// On error nothing changes. On success the first imported record is
    /// active and the collection is saved. Returns the number imported.
    pub fn import_json(&mut self, text: &str) -> Result<Persisted<usize>, RosterError> {
        let imported = exchange::parse_import(text).inspect_err(|e| {
            tracing::warn!("Rejected import: {}", e);
        })?;

        let count = imported.len();
        self.characters = imported;
        self.active_id = self.characters[0].id.clone();
        tracing::info!(count, "Imported characters");

        Ok(Persisted {
            value: count,
            persisted: self.persist_characters(),
        })
    }

    fn persist_characters(&self) -> bool {
        let result = serde_json::to_string(&self.characters)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .save(storage_keys::CHARACTERS, &json)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save characters: {}", e);
                false
            }
        }
    }
}
