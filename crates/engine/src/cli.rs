//! Command-line word parsing.
//!
//! Turns `sheetkeep set <path...> <value>` arguments into a
//! [`CharacterUpdate`]. Paths follow the record's JSON keys and may be given
//! as separate words or dotted (`abilities.dex`, `spellSlots 3 used`).

use sheetkeep_domain::common::parse_leading_int;
use sheetkeep_domain::character_sheet::{NumberField, TextField};
use sheetkeep_domain::entities::{AttackField, Coin, DeathSaveKind};
use sheetkeep_domain::game_systems::{ALIGNMENTS, RACES};
use sheetkeep_domain::{Ability, CharacterClass, CharacterUpdate, DomainError, Skill};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown field path: {0}")]
    UnknownPath(String),

    #[error("Expected a number, got '{0}'")]
    NotANumber(String),

    #[error("Expected yes or no, got '{0}'")]
    NotABool(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`.
pub fn parse_bool(value: &str) -> Result<bool, CommandError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(CommandError::NotABool(value.to_string())),
    }
}

/// Leading-integer parse, the same coercion stored records get.
pub fn parse_int(value: &str) -> Result<i64, CommandError> {
    parse_leading_int(value).ok_or_else(|| CommandError::NotANumber(value.to_string()))
}

/// Zero-based list position.
pub fn parse_index(value: &str) -> Result<usize, CommandError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommandError::NotANumber(value.to_string()))
}

fn parse_i32(value: &str) -> Result<i32, CommandError> {
    Ok(parse_int(value)?.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

fn parse_weight(value: &str) -> Result<f64, CommandError> {
    match value.trim().parse::<f64>() {
        Ok(weight) if weight.is_finite() => Ok(weight),
        _ => Ok(parse_int(value)? as f64),
    }
}

/// Out-of-range levels are kept so validation can reject them.
fn parse_level(value: &str) -> Result<u8, CommandError> {
    Ok(parse_int(value)?.clamp(0, i64::from(u8::MAX)) as u8)
}

fn parse_class(value: &str) -> Result<Option<CharacterClass>, CommandError> {
    match value.trim() {
        "" => Ok(None),
        v if v.eq_ignore_ascii_case("none") => Ok(None),
        v => Ok(Some(v.parse()?)),
    }
}

/// Builds the update for `set <path...> <value>`.
pub fn parse_set(path: &[String], value: &str) -> Result<CharacterUpdate, CommandError> {
    let segments: Vec<String> = path
        .iter()
        .flat_map(|part| part.split('.'))
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    let words: Vec<&str> = segments.iter().map(String::as_str).collect();
    let unknown = || CommandError::UnknownPath(path.join(" "));

    let update = match words.as_slice() {
        ["class"] => CharacterUpdate::SetClass(parse_class(value)?),
        ["level"] => CharacterUpdate::SetLevel(parse_int(value)?),
        ["xp"] => CharacterUpdate::SetXp(parse_int(value)?),
        ["inspiration"] => CharacterUpdate::SetInspiration(parse_bool(value)?),
        ["carriedweight"] => CharacterUpdate::SetCarriedWeight(parse_weight(value)?),
        ["abilities" | "ability", ability] => {
            CharacterUpdate::SetAbilityScore(ability.parse::<Ability>()?, parse_i32(value)?)
        }
        ["savingthrows" | "save", ability] => {
            CharacterUpdate::SetSavingThrow(ability.parse::<Ability>()?, parse_bool(value)?)
        }
        ["skills" | "skill", skill] | ["skills" | "skill", skill, "prof" | "proficient"] => {
            CharacterUpdate::SetSkillProficiency(skill.parse::<Skill>()?, parse_bool(value)?)
        }
        ["expertise", skill] | ["skills" | "skill", skill, "exp" | "expertise"] => {
            CharacterUpdate::SetSkillExpertise(skill.parse::<Skill>()?, parse_bool(value)?)
        }
        ["deathsaves"] if value.trim().eq_ignore_ascii_case("reset") => {
            CharacterUpdate::ResetDeathSaves
        }
        ["deathsaves", kind, index] => CharacterUpdate::SetDeathSave {
            kind: kind.parse::<DeathSaveKind>()?,
            index: parse_index(index)?,
            checked: parse_bool(value)?,
        },
        ["currency", coin] => CharacterUpdate::SetCurrency(coin.parse::<Coin>()?, parse_int(value)?),
        ["spellslots", level, "max"] => CharacterUpdate::SetSpellSlotMax {
            level: parse_level(level)?,
            max: parse_int(value)?,
        },
        ["spellslots", level, "used"] => CharacterUpdate::SetSpellSlotUsed {
            level: parse_level(level)?,
            used: parse_int(value)?,
        },
        [field] => {
            if let Ok(field) = field.parse::<TextField>() {
                CharacterUpdate::SetText(field, value.to_string())
            } else if let Ok(field) = field.parse::<NumberField>() {
                CharacterUpdate::SetNumber(field, parse_i32(value)?)
            } else {
                return Err(unknown());
            }
        }
        _ => return Err(unknown()),
    };
    Ok(update)
}

/// A hint when a race or alignment is not one of the suggested values.
///
/// Both stay free text, so the edit is still applied.
pub fn suggestion_note(update: &CharacterUpdate) -> Option<String> {
    let (label, value, suggestions): (&str, &str, &[&str]) = match update {
        CharacterUpdate::SetText(TextField::Race, value) => ("race", value.as_str(), &RACES[..]),
        CharacterUpdate::SetText(TextField::Alignment, value) => {
            ("alignment", value.as_str(), &ALIGNMENTS[..])
        }
        _ => return None,
    };

    let value = value.trim();
    if value.is_empty() || suggestions.iter().any(|s| s.eq_ignore_ascii_case(value)) {
        return None;
    }
    Some(format!(
        "'{}' is not a listed {} (suggested: {})",
        value,
        label,
        suggestions.join(", ")
    ))
}

/// Builds the update for `attack set <index> <field> <text>`.
pub fn parse_attack_field(
    index: &str,
    field: &str,
    value: &str,
) -> Result<CharacterUpdate, CommandError> {
    Ok(CharacterUpdate::SetAttackField {
        index: parse_index(index)?,
        field: field.parse::<AttackField>()?,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(path: &str, value: &str) -> Result<CharacterUpdate, CommandError> {
        let words: Vec<String> = path.split_whitespace().map(str::to_string).collect();
        parse_set(&words, value)
    }

    #[test]
    fn bools_accept_common_spellings() {
        for yes in ["true", "YES", "on", "1"] {
            assert!(parse_bool(yes).expect("bool"));
        }
        for no in ["false", "No", "off", "0"] {
            assert!(!parse_bool(no).expect("bool"));
        }
        assert!(matches!(parse_bool("maybe"), Err(CommandError::NotABool(_))));
    }

    #[test]
    fn numbers_parse_leniently() {
        assert_eq!(parse_int("12abc").expect("int"), 12);
        assert!(matches!(parse_int("abc"), Err(CommandError::NotANumber(_))));
        assert_eq!(parse_weight("12.5").expect("weight"), 12.5);
    }

    #[test]
    fn identity_and_number_fields() {
        assert_eq!(
            set("playerName", "Sam").expect("text"),
            CharacterUpdate::SetText(TextField::PlayerName, "Sam".into())
        );
        assert_eq!(
            set("hit-dice", "5d8").expect("text"),
            CharacterUpdate::SetText(TextField::HitDice, "5d8".into())
        );
        assert_eq!(
            set("ac", "15").expect("number"),
            CharacterUpdate::SetNumber(NumberField::ArmorClass, 15)
        );
        assert_eq!(set("level", "25").expect("level"), CharacterUpdate::SetLevel(25));
        assert!(matches!(set("charisma", "10"), Err(CommandError::UnknownPath(_))));
    }

    #[test]
    fn class_accepts_none() {
        assert_eq!(
            set("class", "rogue").expect("class"),
            CharacterUpdate::SetClass(Some(CharacterClass::Rogue))
        );
        assert_eq!(set("class", "none").expect("class"), CharacterUpdate::SetClass(None));
        assert_eq!(set("class", "").expect("class"), CharacterUpdate::SetClass(None));
        assert!(matches!(set("class", "Gunslinger"), Err(CommandError::Domain(_))));
    }

    #[test]
    fn nested_paths_in_words_or_dots() {
        assert_eq!(
            set("abilities.dex", "16").expect("score"),
            CharacterUpdate::SetAbilityScore(Ability::Dexterity, 16)
        );
        assert_eq!(
            set("save wis", "yes").expect("save"),
            CharacterUpdate::SetSavingThrow(Ability::Wisdom, true)
        );
        assert_eq!(
            set("skills sleightOfHand", "on").expect("skill"),
            CharacterUpdate::SetSkillProficiency(Skill::SleightOfHand, true)
        );
        assert_eq!(
            set("skills.stealth.exp", "true").expect("expertise"),
            CharacterUpdate::SetSkillExpertise(Skill::Stealth, true)
        );
        assert_eq!(
            set("currency gp", "40").expect("coin"),
            CharacterUpdate::SetCurrency(Coin::Gp, 40)
        );
        assert_eq!(
            set("spellSlots 3 used", "2").expect("slot"),
            CharacterUpdate::SetSpellSlotUsed { level: 3, used: 2 }
        );
    }

    #[test]
    fn death_saves_set_and_reset() {
        assert_eq!(
            set("deathSaves failure 2", "yes").expect("box"),
            CharacterUpdate::SetDeathSave {
                kind: DeathSaveKind::Failure,
                index: 2,
                checked: true
            }
        );
        assert_eq!(set("deathSaves", "reset").expect("reset"), CharacterUpdate::ResetDeathSaves);
        assert!(set("deathSaves", "maybe").is_err());
    }

    #[test]
    fn unlisted_race_or_alignment_gets_a_note() {
        let race = |v: &str| CharacterUpdate::SetText(TextField::Race, v.into());
        let alignment = |v: &str| CharacterUpdate::SetText(TextField::Alignment, v.into());

        assert_eq!(suggestion_note(&race("half-elf")), None);
        assert_eq!(suggestion_note(&race("")), None);
        assert_eq!(suggestion_note(&alignment("Chaotic Good")), None);

        let note = suggestion_note(&race("Warforged")).expect("note");
        assert!(note.starts_with("'Warforged' is not a listed race"));
        assert!(note.contains("Tiefling"));
        let note = suggestion_note(&alignment("Chaotic Stupid")).expect("note");
        assert!(note.contains("True Neutral"));

        assert_eq!(suggestion_note(&CharacterUpdate::SetText(TextField::Notes, "x".into())), None);
    }

    #[test]
    fn attack_fields() {
        assert_eq!(
            parse_attack_field("0", "damage", "1d8").expect("attack"),
            CharacterUpdate::SetAttackField {
                index: 0,
                field: AttackField::Damage,
                value: "1d8".into()
            }
        );
        assert!(parse_attack_field("x", "damage", "1d8").is_err());
        assert!(parse_attack_field("0", "range", "30").is_err());
    }
}
