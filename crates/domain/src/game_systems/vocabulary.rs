//! Fixed D&D 5e vocabulary: abilities, skills, classes and suggestion lists.
//!
//! Serialized names match the keys the browser sheet has always stored
//! (`"str"`, `"animalHandling"`, `"Rogue"`), so older exports load unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

/// One of the six base attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "str", alias = "strength")]
    Strength,
    #[serde(rename = "dex", alias = "dexterity")]
    Dexterity,
    #[serde(rename = "con", alias = "constitution")]
    Constitution,
    #[serde(rename = "int", alias = "intelligence")]
    Intelligence,
    #[serde(rename = "wis", alias = "wisdom")]
    Wisdom,
    #[serde(rename = "cha", alias = "charisma")]
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Storage key (`"str"`).
    pub fn key(self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    /// Sheet abbreviation (`"STR"`).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Ability::ALL
            .into_iter()
            .find(|a| a.key() == needle || a.name().eq_ignore_ascii_case(&needle))
            .ok_or_else(|| DomainError::parse(format!("Unknown ability: {}", s)))
    }
}

/// One of the eighteen skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];

    /// The ability that governs this skill.
    pub fn ability(self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    /// Storage key (`"sleightOfHand"`).
    pub fn key(self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::AnimalHandling => "animalHandling",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Deception => "deception",
            Skill::History => "history",
            Skill::Insight => "insight",
            Skill::Intimidation => "intimidation",
            Skill::Investigation => "investigation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Perception => "perception",
            Skill::Performance => "performance",
            Skill::Persuasion => "persuasion",
            Skill::Religion => "religion",
            Skill::SleightOfHand => "sleightOfHand",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Deception => "Deception",
            Skill::History => "History",
            Skill::Insight => "Insight",
            Skill::Intimidation => "Intimidation",
            Skill::Investigation => "Investigation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Perception => "Perception",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
            Skill::Religion => "Religion",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Skill {
    type Err = DomainError;

    /// Accepts the storage key or the label, ignoring case, spaces, `-` and `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalize = |v: &str| {
            v.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let needle = normalize(s);
        Skill::ALL
            .into_iter()
            .find(|skill| normalize(skill.key()) == needle)
            .ok_or_else(|| DomainError::parse(format!("Unknown skill: {}", s)))
    }
}

/// Player's handbook classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 12] = [
        CharacterClass::Barbarian,
        CharacterClass::Bard,
        CharacterClass::Cleric,
        CharacterClass::Druid,
        CharacterClass::Fighter,
        CharacterClass::Monk,
        CharacterClass::Paladin,
        CharacterClass::Ranger,
        CharacterClass::Rogue,
        CharacterClass::Sorcerer,
        CharacterClass::Warlock,
        CharacterClass::Wizard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Common subclasses offered for this class.
    pub fn subclasses(self) -> &'static [&'static str] {
        match self {
            CharacterClass::Barbarian => &[
                "Path of the Berserker",
                "Path of the Totem Warrior",
                "Path of the Zealot",
            ],
            CharacterClass::Bard => &["College of Lore", "College of Valor", "College of Glamour"],
            CharacterClass::Cleric => &[
                "Life Domain",
                "Light Domain",
                "Trickery Domain",
                "War Domain",
            ],
            CharacterClass::Druid => &["Circle of the Land", "Circle of the Moon"],
            CharacterClass::Fighter => &["Champion", "Battle Master", "Eldritch Knight"],
            CharacterClass::Monk => &[
                "Way of the Open Hand",
                "Way of Shadow",
                "Way of the Four Elements",
            ],
            CharacterClass::Paladin => &[
                "Oath of Devotion",
                "Oath of the Ancients",
                "Oath of Vengeance",
            ],
            CharacterClass::Ranger => &["Hunter", "Beast Master"],
            CharacterClass::Rogue => &["Thief", "Assassin", "Arcane Trickster"],
            CharacterClass::Sorcerer => &["Draconic Bloodline", "Wild Magic"],
            CharacterClass::Warlock => &["The Fiend", "The Archfey", "The Great Old One"],
            CharacterClass::Wizard => &[
                "School of Evocation",
                "School of Illusion",
                "School of Necromancy",
            ],
        }
    }

    pub fn has_subclass(self, subclass: &str) -> bool {
        self.subclasses()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(subclass.trim()))
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CharacterClass::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::parse(format!("Unknown class: {}", s)))
    }
}

impl Serialize for CharacterClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CharacterClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for the record's class slot, where `""` means unselected.
pub mod class_slot {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::CharacterClass;
    use crate::common::none_if_blank;

    pub fn serialize<S: Serializer>(
        value: &Option<CharacterClass>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(CharacterClass::name).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CharacterClass>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        match none_if_blank(&raw) {
            None => Ok(None),
            Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Suggested races; the record stores race as free text.
pub const RACES: [&str; 9] = [
    "Human",
    "Dwarf",
    "Elf",
    "Halfling",
    "Dragonborn",
    "Gnome",
    "Half-Elf",
    "Half-Orc",
    "Tiefling",
];

/// Suggested alignments; the record stores alignment as free text.
pub const ALIGNMENTS: [&str; 9] = [
    "Lawful Good",
    "Neutral Good",
    "Chaotic Good",
    "Lawful Neutral",
    "True Neutral",
    "Chaotic Neutral",
    "Lawful Evil",
    "Neutral Evil",
    "Chaotic Evil",
];
