//! Domain entities - Core business objects with identity

mod character;

pub use character::{
    AbilityScores, Attack, AttackField, Character, Coin, Currency, DeathSaveKind, DeathSaves,
    SavingThrows, SkillProficiency, SkillSet, SpellSlot, SpellSlots, DUPLICATE_SUFFIX,
    SPELL_SLOT_LEVELS,
};
