//! Printable character sheet.
//!
//! A read-only document built from a record and its derived model. The text
//! rendering is what `sheetkeep show` prints; other renderers can walk the
//! sections directly.

use std::fmt;

use sheetkeep_domain::character_sheet::{format_gold, format_modifier};
use sheetkeep_domain::entities::{Coin, DeathSaveKind};
use sheetkeep_domain::{Character, DerivedModel, ProficiencyLevel};

/// One titled block of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSection {
    pub heading: &'static str,
    pub lines: Vec<String>,
}

impl SheetSection {
    fn new(heading: &'static str, lines: Vec<String>) -> Self {
        Self { heading, lines }
    }

    /// A free text block; blank text renders as a dash.
    fn text(heading: &'static str, body: &str) -> Self {
        let lines = if body.trim().is_empty() {
            vec!["-".to_string()]
        } else {
            body.lines().map(str::to_string).collect()
        };
        Self::new(heading, lines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableSheet {
    pub title: String,
    pub sections: Vec<SheetSection>,
}

impl PrintableSheet {
    pub fn build(character: &Character, derived: &DerivedModel) -> Self {
        let sections = vec![
            header(character),
            SheetSection::new(
                "Abilities",
                derived
                    .abilities
                    .iter()
                    .map(|line| {
                        format!(
                            "{:<4}{:>3}  ({})",
                            line.ability.abbreviation(),
                            line.score,
                            format_modifier(line.modifier)
                        )
                    })
                    .collect(),
            ),
            SheetSection::new(
                "Saving Throws",
                derived
                    .saving_throws
                    .iter()
                    .map(|line| {
                        format!(
                            "{} {:<4}{}",
                            if line.proficient { "*" } else { " " },
                            line.ability.abbreviation(),
                            format_modifier(line.total)
                        )
                    })
                    .collect(),
            ),
            SheetSection::new(
                "Skills",
                derived
                    .skills
                    .iter()
                    .map(|line| {
                        let marker = match line.proficiency {
                            ProficiencyLevel::Expert => "**",
                            ProficiencyLevel::Proficient => "*",
                            ProficiencyLevel::None => "",
                        };
                        format!(
                            "{:<2} {:<16}{:>3}  ({})",
                            marker,
                            line.skill.label(),
                            format_modifier(line.total),
                            line.ability.abbreviation()
                        )
                    })
                    .collect(),
            ),
            combat(character, derived),
            death_saves(character),
            attacks(character),
            SheetSection::new(
                "Spell Slots",
                spell_slot_lines(derived),
            ),
            SheetSection::new(
                "Currency",
                vec![
                    Coin::ALL
                        .iter()
                        .map(|&coin| format!("{} {}", coin.label(), character.currency.get(coin)))
                        .collect::<Vec<_>>()
                        .join("  "),
                    format!("Wealth: {} gp", format_gold(derived.wealth_in_gold)),
                    format!(
                        "Carried: {} / {} lb",
                        character.carried_weight, derived.carrying_capacity
                    ),
                ],
            ),
            SheetSection::text("Equipment", &character.equipment),
            SheetSection::text("Features & Traits", &character.features),
            SheetSection::text("Notes", &character.notes),
        ];

        Self {
            title: character.name.clone(),
            sections,
        }
    }

    pub fn section(&self, heading: &str) -> Option<&SheetSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

fn header(character: &Character) -> SheetSection {
    let class = match (character.class, character.subclass.trim()) {
        (None, _) => "No class".to_string(),
        (Some(class), "") => class.to_string(),
        (Some(class), subclass) => format!("{} ({})", class, subclass),
    };
    let or_dash = |value: &str| {
        if value.trim().is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };

    SheetSection::new(
        "Character",
        vec![
            format!("{}, level {}", class, character.level),
            format!("Race: {}", or_dash(&character.race)),
            format!("Background: {}", or_dash(&character.background)),
            format!("Alignment: {}", or_dash(&character.alignment)),
            format!("Player: {}", or_dash(&character.player_name)),
            format!(
                "XP: {}{}",
                character.xp,
                if character.inspiration { "  (inspired)" } else { "" }
            ),
        ],
    )
}

fn combat(character: &Character, derived: &DerivedModel) -> SheetSection {
    let mut hp = format!("HP: {} / {}", character.current_hp, character.max_hp);
    if character.temp_hp != 0 {
        hp.push_str(&format!(" (+{} temp)", character.temp_hp));
    }

    SheetSection::new(
        "Combat",
        vec![
            format!(
                "AC {}  Initiative {}  Speed {} ft",
                character.ac,
                format_modifier(derived.initiative),
                character.speed
            ),
            hp,
            format!("Hit Dice: {}", character.hit_dice),
            format!("Proficiency Bonus: {}", format_modifier(derived.proficiency_bonus)),
            format!("Passive Perception: {}", derived.passive_perception),
            format!(
                "Passive Stealth: {}",
                if character.passive_stealth.trim().is_empty() {
                    "-"
                } else {
                    character.passive_stealth.as_str()
                }
            ),
        ],
    )
}

fn death_saves(character: &Character) -> SheetSection {
    let row = |kind: DeathSaveKind| {
        character
            .death_saves
            .row(kind)
            .iter()
            .map(|&checked| if checked { "[x]" } else { "[ ]" })
            .collect::<String>()
    };

    SheetSection::new(
        "Death Saves",
        vec![
            format!("Successes {}", row(DeathSaveKind::Success)),
            format!("Failures  {}", row(DeathSaveKind::Failure)),
        ],
    )
}

fn attacks(character: &Character) -> SheetSection {
    if character.attacks.is_empty() {
        return SheetSection::new("Attacks", vec!["-".to_string()]);
    }

    let lines = character
        .attacks
        .iter()
        .map(|attack| {
            let mut line = format!("{}  {}  {}", attack.name, attack.attack_bonus, attack.damage);
            if !attack.damage_type.is_empty() {
                line.push(' ');
                line.push_str(&attack.damage_type);
            }
            if !attack.notes.is_empty() {
                line.push_str("  ");
                line.push_str(&attack.notes);
            }
            line
        })
        .collect();
    SheetSection::new("Attacks", lines)
}

/// Only levels with at least one slot are listed.
fn spell_slot_lines(derived: &DerivedModel) -> Vec<String> {
    let lines: Vec<String> = derived
        .spell_slots
        .iter()
        .filter(|slot| slot.max > 0)
        .map(|slot| format!("Level {}: {} / {}", slot.level, slot.remaining, slot.max))
        .collect();
    if lines.is_empty() {
        vec!["-".to_string()]
    } else {
        lines
    }
}

impl fmt::Display for PrintableSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count().max(1)))?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.heading)?;
            writeln!(f, "{}", "-".repeat(section.heading.len()))?;
            for line in &section.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}
