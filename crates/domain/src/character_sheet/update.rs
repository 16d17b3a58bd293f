//! Typed record edits
//!
//! Every edit the sheet supports is one `CharacterUpdate` variant, so an
//! invalid field path cannot be expressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{Attack, AttackField, Character, Coin, DeathSaveKind};
use crate::error::DomainError;
use crate::game_systems::{Ability, CharacterClass, ClassRules, Skill};

/// Lowest and highest ability score accepted by an edit.
pub const ABILITY_SCORE_RANGE: (i32, i32) = (3, 30);

/// Free-text fields of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    Name,
    PlayerName,
    Subclass,
    Race,
    Background,
    Alignment,
    PassiveStealth,
    HitDice,
    Equipment,
    Features,
    Notes,
}

/// Unvalidated integer fields of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberField {
    ArmorClass,
    InitiativeMisc,
    Speed,
    MaxHp,
    CurrentHp,
    TempHp,
}

macro_rules! field_names {
    ($ty:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Record key (`"playerName"`).
            pub fn key(self) -> &'static str {
                match self {
                    $($ty::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            /// Matches the record key ignoring case, `-` and `_`.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle: String = s
                    .chars()
                    .filter(|c| !matches!(c, '-' | '_'))
                    .collect();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|field| field.key().eq_ignore_ascii_case(&needle))
                    .ok_or_else(|| DomainError::parse(format!("Unknown field: {}", s)))
            }
        }
    };
}

field_names!(TextField {
    Name => "name",
    PlayerName => "playerName",
    Subclass => "subclass",
    Race => "race",
    Background => "background",
    Alignment => "alignment",
    PassiveStealth => "passiveStealth",
    HitDice => "hitDice",
    Equipment => "equipment",
    Features => "features",
    Notes => "notes",
});

field_names!(NumberField {
    ArmorClass => "ac",
    InitiativeMisc => "initiativeMisc",
    Speed => "speed",
    MaxHp => "maxHp",
    CurrentHp => "currentHp",
    TempHp => "tempHp",
});

/// A single edit to a character record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacterUpdate {
    SetText(TextField, String),
    SetNumber(NumberField, i32),
    /// `None` clears the class.
    SetClass(Option<CharacterClass>),
    /// Clamped to 1..=20.
    SetLevel(i64),
    /// Floored at 0.
    SetXp(i64),
    SetInspiration(bool),
    /// Clamped to [`ABILITY_SCORE_RANGE`].
    SetAbilityScore(Ability, i32),
    SetSavingThrow(Ability, bool),
    SetSkillProficiency(Skill, bool),
    SetSkillExpertise(Skill, bool),
    SetDeathSave {
        kind: DeathSaveKind,
        index: usize,
        checked: bool,
    },
    ResetDeathSaves,
    SetCurrency(Coin, i64),
    SetCarriedWeight(f64),
    AddAttack,
    RemoveAttack(usize),
    SetAttackField {
        index: usize,
        field: AttackField,
        value: String,
    },
    /// Floored at 0; `used` is clamped down to the new maximum.
    SetSpellSlotMax {
        level: u8,
        max: i64,
    },
    /// Clamped into `[0, max]`.
    SetSpellSlotUsed {
        level: u8,
        used: i64,
    },
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

impl CharacterUpdate {
    /// Applies the edit to the record.
    ///
    /// Bounds are not re-checked here: an out-of-range attack index, death
    /// save box or spell level leaves the record untouched. Run the edit
    /// through [`super::validate`] first to report those.
    pub fn apply_to(self, character: &mut Character, rules: &dyn ClassRules) {
        match self {
            CharacterUpdate::SetText(field, value) => {
                let target = match field {
                    TextField::Name => &mut character.name,
                    TextField::PlayerName => &mut character.player_name,
                    TextField::Subclass => &mut character.subclass,
                    TextField::Race => &mut character.race,
                    TextField::Background => &mut character.background,
                    TextField::Alignment => &mut character.alignment,
                    TextField::PassiveStealth => &mut character.passive_stealth,
                    TextField::HitDice => &mut character.hit_dice,
                    TextField::Equipment => &mut character.equipment,
                    TextField::Features => &mut character.features,
                    TextField::Notes => &mut character.notes,
                };
                *target = value;
            }
            CharacterUpdate::SetNumber(field, value) => {
                let target = match field {
                    NumberField::ArmorClass => &mut character.ac,
                    NumberField::InitiativeMisc => &mut character.initiative_misc,
                    NumberField::Speed => &mut character.speed,
                    NumberField::MaxHp => &mut character.max_hp,
                    NumberField::CurrentHp => &mut character.current_hp,
                    NumberField::TempHp => &mut character.temp_hp,
                };
                *target = value;
            }
            CharacterUpdate::SetClass(class) => {
                let keeps_subclass = class.is_some_and(|c| c.has_subclass(&character.subclass));
                if !keeps_subclass {
                    character.subclass.clear();
                }
                character.class = class;
                character.apply_class_defaults(rules);
            }
            CharacterUpdate::SetLevel(level) => character.level = level.clamp(1, 20) as u8,
            CharacterUpdate::SetXp(xp) => character.xp = clamp_count(xp),
            CharacterUpdate::SetInspiration(on) => character.inspiration = on,
            CharacterUpdate::SetAbilityScore(ability, score) => {
                let (lo, hi) = ABILITY_SCORE_RANGE;
                character.abilities.set(ability, score.clamp(lo, hi));
            }
            CharacterUpdate::SetSavingThrow(ability, checked) => {
                character.saving_throws.set(ability, checked)
            }
            CharacterUpdate::SetSkillProficiency(skill, checked) => {
                character.skills.set_proficient(skill, checked)
            }
            CharacterUpdate::SetSkillExpertise(skill, checked) => {
                character.skills.set_expertise(skill, checked)
            }
            CharacterUpdate::SetDeathSave {
                kind,
                index,
                checked,
            } => {
                if let Some(slot) = character.death_saves.row_mut(kind).get_mut(index) {
                    *slot = checked;
                }
            }
            CharacterUpdate::ResetDeathSaves => character.death_saves.reset(),
            CharacterUpdate::SetCurrency(coin, amount) => character.currency.set(coin, amount),
            CharacterUpdate::SetCarriedWeight(weight) => {
                character.carried_weight = if weight.is_finite() { weight } else { 0.0 };
            }
            CharacterUpdate::AddAttack => character.attacks.push(Attack::placeholder()),
            CharacterUpdate::RemoveAttack(index) => {
                if index < character.attacks.len() {
                    character.attacks.remove(index);
                }
            }
            CharacterUpdate::SetAttackField {
                index,
                field,
                value,
            } => {
                if let Some(attack) = character.attacks.get_mut(index) {
                    *attack.field_mut(field) = value;
                }
            }
            CharacterUpdate::SetSpellSlotMax { level, max } => {
                if let Some(slot) = character.spell_slots.get_mut(level) {
                    slot.max = clamp_count(max);
                    slot.used = slot.used.min(slot.max);
                }
            }
            CharacterUpdate::SetSpellSlotUsed { level, used } => {
                if let Some(slot) = character.spell_slots.get_mut(level) {
                    slot.used = clamp_count(used).min(slot.max);
                }
            }
        }
    }
}
