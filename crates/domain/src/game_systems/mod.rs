//! Game system implementation for D&D 5th Edition.
//!
//! The traits in `traits.rs` are the seam between the ruleset and the
//! character sheet; `dnd5e.rs` provides the only implementation.

mod dnd5e;
mod traits;
mod vocabulary;

pub use dnd5e::Dnd5eSystem;

pub use traits::{
    CalculationEngine, ClassRules, GameSystem, ProficiencyLevel, SkillChoices, SkillPool,
};

pub use vocabulary::{class_slot, Ability, CharacterClass, Skill, ALIGNMENTS, RACES};
