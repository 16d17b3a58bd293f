//! Pure rules core of the character sheet: ruleset tables, derived stats,
//! constraint evaluation and the character record lifecycle.

pub mod character_sheet;
pub mod common;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use character_sheet::{
    apply_update, validate, CharacterUpdate, ConstraintModel, ConstraintViolation, DerivedModel,
    EditWarning,
};
pub use entities::Character;
pub use error::DomainError;
pub use game_systems::{
    Ability, CalculationEngine, CharacterClass, ClassRules, Dnd5eSystem, GameSystem,
    ProficiencyLevel, Skill,
};
pub use ids::CharacterId;
pub use value_objects::SheetSettings;
