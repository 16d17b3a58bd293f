//! Character record - one player character sheet
//!
//! The record keeps the browser sheet's historical JSON layout. Every field
//! has a default, so a partial record deserializes into a full one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{lenient, or_default_name};
use crate::error::DomainError;
use crate::game_systems::{class_slot, Ability, CharacterClass, ClassRules, Skill};
use crate::ids::CharacterId;

/// Appended to the name of a duplicated record.
pub const DUPLICATE_SUFFIX: &str = " Copy";

/// Highest spell slot level.
pub const SPELL_SLOT_LEVELS: u8 = 9;

/// A player character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    #[serde(deserialize_with = "lenient_id")]
    pub id: CharacterId,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub player_name: String,
    #[serde(with = "class_slot")]
    pub class: Option<CharacterClass>,
    #[serde(deserialize_with = "lenient::text")]
    pub subclass: String,
    #[serde(deserialize_with = "lenient::text")]
    pub race: String,
    #[serde(deserialize_with = "lenient::text")]
    pub background: String,
    #[serde(deserialize_with = "lenient::text")]
    pub alignment: String,
    #[serde(deserialize_with = "lenient::count")]
    pub xp: u32,
    #[serde(deserialize_with = "lenient::level")]
    pub level: u8,
    #[serde(deserialize_with = "lenient::flag")]
    pub inspiration: bool,

    pub abilities: AbilityScores,
    pub saving_throws: SavingThrows,
    pub skills: SkillSet,

    // Combat
    #[serde(deserialize_with = "lenient::int")]
    pub ac: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub initiative_misc: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub speed: i32,
    /// Free-text override shown instead of a computed value.
    #[serde(deserialize_with = "lenient::text")]
    pub passive_stealth: String,
    #[serde(deserialize_with = "lenient::text")]
    pub hit_dice: String,
    #[serde(deserialize_with = "lenient::int")]
    pub max_hp: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub current_hp: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub temp_hp: i32,
    pub death_saves: DeathSaves,

    // Inventory
    pub currency: Currency,
    #[serde(deserialize_with = "lenient::number")]
    pub carried_weight: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub equipment: String,
    pub attacks: Vec<Attack>,
    pub spell_slots: SpellSlots,

    #[serde(deserialize_with = "lenient::text")]
    pub features: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
}

/// Defaults used to fill records; the id is left blank so that callers can
/// tell a record that never had one.
impl Default for Character {
    fn default() -> Self {
        Self {
            id: CharacterId::default(),
            name: String::new(),
            player_name: String::new(),
            class: None,
            subclass: String::new(),
            race: String::new(),
            background: String::new(),
            alignment: String::new(),
            xp: 0,
            level: 1,
            inspiration: false,
            abilities: AbilityScores::default(),
            saving_throws: SavingThrows::default(),
            skills: SkillSet::default(),
            ac: 10,
            initiative_misc: 0,
            speed: 30,
            passive_stealth: String::new(),
            hit_dice: "1d8".to_string(),
            max_hp: 10,
            current_hp: 10,
            temp_hp: 0,
            death_saves: DeathSaves::default(),
            currency: Currency::default(),
            carried_weight: 0.0,
            equipment: String::new(),
            attacks: Vec::new(),
            spell_slots: SpellSlots::default(),
            features: String::new(),
            notes: String::new(),
        }
    }
}

/// Null or numeric ids read back as text; blank ones are replaced later.
fn lenient_id<'de, D: serde::Deserializer<'de>>(d: D) -> Result<CharacterId, D::Error> {
    lenient::text(d).map(CharacterId::from)
}

impl Character {
    /// A fully defaulted record with a fresh id. A blank name becomes
    /// "New Character".
    pub fn create_default(name: &str) -> Self {
        Self {
            id: CharacterId::new(),
            name: or_default_name(name),
            ..Self::default()
        }
    }

    /// Deep copy with a fresh id and a suffixed name. Nothing else changes.
    pub fn duplicate(&self) -> Self {
        Self {
            id: CharacterId::new(),
            name: format!("{}{}", self.name, DUPLICATE_SUFFIX),
            ..self.clone()
        }
    }

    /// Assigns a fresh id if the record has none. Returns whether it did.
    pub fn ensure_id(&mut self) -> bool {
        if self.id.is_blank() {
            self.id = CharacterId::new();
            true
        } else {
            false
        }
    }

    /// Marks every saving throw the class grants as proficient.
    ///
    /// Idempotent. Returns whether the record changed.
    pub fn apply_class_defaults(&mut self, rules: &dyn ClassRules) -> bool {
        let Some(class) = self.class else {
            return false;
        };
        let mut changed = false;
        for &ability in rules.saving_throw_grants(class) {
            if !self.saving_throws.get(ability) {
                self.saving_throws.set(ability, true);
                changed = true;
            }
        }
        changed
    }
}

macro_rules! per_ability {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $default:expr, $de:tt) => {
        $(#[$meta])*
        ///
        /// A key missing from stored data reads as the type's zero value, the
        /// same as a blank or null entry. [`Default`] is used for new records.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "str", alias = "strength", default, deserialize_with = $de)]
            pub strength: $ty,
            #[serde(rename = "dex", alias = "dexterity", default, deserialize_with = $de)]
            pub dexterity: $ty,
            #[serde(rename = "con", alias = "constitution", default, deserialize_with = $de)]
            pub constitution: $ty,
            #[serde(rename = "int", alias = "intelligence", default, deserialize_with = $de)]
            pub intelligence: $ty,
            #[serde(rename = "wis", alias = "wisdom", default, deserialize_with = $de)]
            pub wisdom: $ty,
            #[serde(rename = "cha", alias = "charisma", default, deserialize_with = $de)]
            pub charisma: $ty,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    strength: $default,
                    dexterity: $default,
                    constitution: $default,
                    intelligence: $default,
                    wisdom: $default,
                    charisma: $default,
                }
            }
        }

        impl $name {
            pub fn get(&self, ability: Ability) -> $ty {
                match ability {
                    Ability::Strength => self.strength,
                    Ability::Dexterity => self.dexterity,
                    Ability::Constitution => self.constitution,
                    Ability::Intelligence => self.intelligence,
                    Ability::Wisdom => self.wisdom,
                    Ability::Charisma => self.charisma,
                }
            }

            pub fn set(&mut self, ability: Ability, value: $ty) {
                let slot = match ability {
                    Ability::Strength => &mut self.strength,
                    Ability::Dexterity => &mut self.dexterity,
                    Ability::Constitution => &mut self.constitution,
                    Ability::Intelligence => &mut self.intelligence,
                    Ability::Wisdom => &mut self.wisdom,
                    Ability::Charisma => &mut self.charisma,
                };
                *slot = value;
            }
        }
    };
}

per_ability!(
    /// The six ability scores.
    AbilityScores,
    i32,
    10,
    "lenient::int"
);

per_ability!(
    /// Saving-throw proficiency per ability.
    SavingThrows,
    bool,
    false,
    "lenient::flag"
);

impl SavingThrows {
    /// Number of proficient saving throws.
    pub fn count(&self) -> usize {
        Ability::ALL.into_iter().filter(|&a| self.get(a)).count()
    }
}

/// Proficiency flags for one skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillProficiency {
    #[serde(rename = "prof", alias = "proficient", deserialize_with = "lenient::flag")]
    pub proficient: bool,
    #[serde(rename = "exp", alias = "expertise", deserialize_with = "lenient::flag")]
    pub expertise: bool,
}

/// All eighteen skills, always present.
///
/// Expertise without proficiency is dropped on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, SkillProficiency>",
    into = "BTreeMap<Skill, SkillProficiency>"
)]
pub struct SkillSet(BTreeMap<Skill, SkillProficiency>);

impl Default for SkillSet {
    fn default() -> Self {
        Self(
            Skill::ALL
                .into_iter()
                .map(|skill| (skill, SkillProficiency::default()))
                .collect(),
        )
    }
}

impl SkillSet {
    pub fn get(&self, skill: Skill) -> SkillProficiency {
        self.0.get(&skill).copied().unwrap_or_default()
    }

    /// Sets proficiency; removing it also removes expertise.
    pub fn set_proficient(&mut self, skill: Skill, proficient: bool) {
        let entry = self.0.entry(skill).or_default();
        entry.proficient = proficient;
        if !proficient {
            entry.expertise = false;
        }
    }

    /// Sets expertise. Has no effect on a skill without proficiency.
    pub fn set_expertise(&mut self, skill: Skill, expertise: bool) {
        let entry = self.0.entry(skill).or_default();
        entry.expertise = expertise && entry.proficient;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, SkillProficiency)> + '_ {
        self.0.iter().map(|(skill, entry)| (*skill, *entry))
    }

    pub fn expertise_count(&self) -> usize {
        self.0.values().filter(|e| e.expertise).count()
    }
}

impl From<BTreeMap<String, SkillProficiency>> for SkillSet {
    fn from(raw: BTreeMap<String, SkillProficiency>) -> Self {
        let mut skills = SkillSet::default();
        for (key, entry) in raw {
            // Unknown keys are ignored.
            if let Ok(skill) = key.parse::<Skill>() {
                skills.set_proficient(skill, entry.proficient);
                skills.set_expertise(skill, entry.expertise);
            }
        }
        skills
    }
}

impl From<SkillSet> for BTreeMap<Skill, SkillProficiency> {
    fn from(skills: SkillSet) -> Self {
        skills.0
    }
}

/// Which row of death-save boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathSaveKind {
    Success,
    Failure,
}

impl std::str::FromStr for DeathSaveKind {
    type Err = DomainError;

    /// Accepts `success`/`failure` and their plurals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" | "successes" => Ok(DeathSaveKind::Success),
            "failure" | "failures" => Ok(DeathSaveKind::Failure),
            _ => Err(DomainError::parse(format!("Unknown death save row: {}", s))),
        }
    }
}

/// Three success and three failure boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathSaves {
    #[serde(deserialize_with = "three_boxes")]
    pub success: [bool; 3],
    #[serde(deserialize_with = "three_boxes")]
    pub failure: [bool; 3],
}

impl DeathSaves {
    pub fn row(&self, kind: DeathSaveKind) -> &[bool; 3] {
        match kind {
            DeathSaveKind::Success => &self.success,
            DeathSaveKind::Failure => &self.failure,
        }
    }

    pub fn row_mut(&mut self, kind: DeathSaveKind) -> &mut [bool; 3] {
        match kind {
            DeathSaveKind::Success => &mut self.success,
            DeathSaveKind::Failure => &mut self.failure,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Deserialize)]
struct LenientBox(#[serde(deserialize_with = "lenient::flag")] bool);

/// A box row of any length; extra entries are dropped, missing ones unchecked.
fn three_boxes<'de, D: serde::Deserializer<'de>>(d: D) -> Result<[bool; 3], D::Error> {
    let raw = Option::<Vec<LenientBox>>::deserialize(d)?.unwrap_or_default();
    let mut boxes = [false; 3];
    for (slot, value) in boxes.iter_mut().zip(raw) {
        *slot = value.0;
    }
    Ok(boxes)
}

/// Coin counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    #[serde(deserialize_with = "lenient::long")]
    pub cp: i64,
    #[serde(deserialize_with = "lenient::long")]
    pub sp: i64,
    #[serde(deserialize_with = "lenient::long")]
    pub ep: i64,
    #[serde(deserialize_with = "lenient::long")]
    pub gp: i64,
    #[serde(deserialize_with = "lenient::long")]
    pub pp: i64,
}

/// A coin denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    Cp,
    Sp,
    Ep,
    Gp,
    Pp,
}

impl Coin {
    pub const ALL: [Coin; 5] = [Coin::Cp, Coin::Sp, Coin::Ep, Coin::Gp, Coin::Pp];

    pub fn key(self) -> &'static str {
        match self {
            Coin::Cp => "cp",
            Coin::Sp => "sp",
            Coin::Ep => "ep",
            Coin::Gp => "gp",
            Coin::Pp => "pp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Coin::Cp => "CP",
            Coin::Sp => "SP",
            Coin::Ep => "EP",
            Coin::Gp => "GP",
            Coin::Pp => "PP",
        }
    }
}

impl std::str::FromStr for Coin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Coin::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::parse(format!("Unknown coin: {}", s)))
    }
}

impl Currency {
    pub fn get(&self, coin: Coin) -> i64 {
        match coin {
            Coin::Cp => self.cp,
            Coin::Sp => self.sp,
            Coin::Ep => self.ep,
            Coin::Gp => self.gp,
            Coin::Pp => self.pp,
        }
    }

    pub fn set(&mut self, coin: Coin, amount: i64) {
        match coin {
            Coin::Cp => self.cp = amount,
            Coin::Sp => self.sp = amount,
            Coin::Ep => self.ep = amount,
            Coin::Gp => self.gp = amount,
            Coin::Pp => self.pp = amount,
        }
    }
}

/// One row of the attacks table. Every field is free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attack {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub attack_bonus: String,
    #[serde(deserialize_with = "lenient::text")]
    pub damage: String,
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub damage_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub notes: String,
}

impl Attack {
    /// The row appended by "add attack".
    pub fn placeholder() -> Self {
        Self {
            name: "Attack".to_string(),
            ..Self::default()
        }
    }

    pub fn field_mut(&mut self, field: AttackField) -> &mut String {
        match field {
            AttackField::Name => &mut self.name,
            AttackField::AttackBonus => &mut self.attack_bonus,
            AttackField::Damage => &mut self.damage,
            AttackField::DamageType => &mut self.damage_type,
            AttackField::Notes => &mut self.notes,
        }
    }
}

/// Editable column of an attack row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackField {
    Name,
    AttackBonus,
    Damage,
    #[serde(rename = "type")]
    DamageType,
    Notes,
}

impl std::str::FromStr for AttackField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match needle.trim() {
            "name" => Ok(AttackField::Name),
            "attackbonus" | "bonus" => Ok(AttackField::AttackBonus),
            "damage" => Ok(AttackField::Damage),
            "type" | "damagetype" => Ok(AttackField::DamageType),
            "notes" => Ok(AttackField::Notes),
            _ => Err(DomainError::parse(format!("Unknown attack field: {}", s))),
        }
    }
}

/// Maximum and used count for one spell level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellSlot {
    #[serde(deserialize_with = "lenient::count")]
    pub max: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub used: u32,
}

impl SpellSlot {
    /// Slots left, never negative. Does not touch `used`.
    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }
}

/// Spell slots for levels 1 through 9, stored as `{"1": {...}, ..., "9": {...}}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, SpellSlot>",
    into = "BTreeMap<String, SpellSlot>"
)]
pub struct SpellSlots([SpellSlot; SPELL_SLOT_LEVELS as usize]);

impl SpellSlots {
    /// Slot for a spell level; `None` outside 1..=9.
    pub fn get(&self, level: u8) -> Option<&SpellSlot> {
        self.0.get(usize::from(level).checked_sub(1)?)
    }

    pub fn get_mut(&mut self, level: u8) -> Option<&mut SpellSlot> {
        self.0.get_mut(usize::from(level).checked_sub(1)?)
    }

    /// `(level, slot)` pairs in level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &SpellSlot)> + '_ {
        (1..=SPELL_SLOT_LEVELS).zip(self.0.iter())
    }
}

impl From<BTreeMap<String, SpellSlot>> for SpellSlots {
    fn from(raw: BTreeMap<String, SpellSlot>) -> Self {
        let mut slots = SpellSlots::default();
        for (key, slot) in raw {
            let level = crate::common::parse_leading_int(&key)
                .and_then(|l| u8::try_from(l).ok());
            if let Some(target) = level.and_then(|l| slots.get_mut(l)) {
                *target = slot;
            }
        }
        slots
    }
}

impl From<SpellSlots> for BTreeMap<String, SpellSlot> {
    fn from(slots: SpellSlots) -> Self {
        slots
            .iter()
            .map(|(level, slot)| (level.to_string(), *slot))
            .collect()
    }
}
