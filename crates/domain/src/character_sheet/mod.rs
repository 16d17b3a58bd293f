//! Character sheet rules engine
//!
//! Pure functions over a [`Character`]: the derived stat calculator, the
//! constraint evaluator and the typed edit pipeline. The composing layer
//! owns the records and persistence; nothing here does I/O.

mod constraints;
mod derived;
mod update;

pub use constraints::{
    validate, ConstraintModel, ConstraintViolation, Control, ControlState, DisabledReason,
    EditWarning, SavingThrowControl, SkillControl, Tally,
};
pub use derived::{
    format_gold, format_modifier, wealth_in_gold, AbilityLine, DerivedModel, SavingThrowLine,
    SkillLine, SpellSlotLine,
};
pub use update::{CharacterUpdate, NumberField, TextField, ABILITY_SCORE_RANGE};

use crate::entities::Character;
use crate::game_systems::ClassRules;
use crate::value_objects::SheetSettings;

/// Validates and applies one edit.
///
/// On a violation the record is left unchanged. Otherwise the edit is
/// applied and, unless the class override is on, class defaults are
/// re-applied. Returns the soft warning, if any.
pub fn apply_update(
    character: &mut Character,
    update: CharacterUpdate,
    rules: &dyn ClassRules,
    settings: &SheetSettings,
) -> Result<Option<EditWarning>, ConstraintViolation> {
    let warning = validate(character, rules, settings, &update)?;
    update.apply_to(character, rules);
    if !settings.allow_class_override {
        character.apply_class_defaults(rules);
    }
    Ok(warning)
}
