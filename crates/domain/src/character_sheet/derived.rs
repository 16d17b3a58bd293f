//! Derived stat calculator
//!
//! Maps a character record to every computed display value. Pure: nothing
//! here mutates the record.

use serde::Serialize;

use crate::entities::{Character, SPELL_SLOT_LEVELS};
use crate::game_systems::{Ability, CalculationEngine, ProficiencyLevel, Skill};

/// Score and modifier for one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityLine {
    pub ability: Ability,
    pub score: i32,
    pub modifier: i32,
}

/// Saving throw total for one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrowLine {
    pub ability: Ability,
    pub proficient: bool,
    pub total: i32,
}

/// Skill total with the proficiency level that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLine {
    pub skill: Skill,
    pub ability: Ability,
    #[serde(skip)]
    pub proficiency: ProficiencyLevel,
    pub total: i32,
}

/// Spell slot usage for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlotLine {
    pub level: u8,
    pub max: u32,
    pub used: u32,
    pub remaining: u32,
}

/// Every computed value for a character at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedModel {
    pub proficiency_bonus: i32,
    pub abilities: [AbilityLine; 6],
    pub saving_throws: [SavingThrowLine; 6],
    pub skills: Vec<SkillLine>,
    pub passive_perception: i32,
    pub initiative: i32,
    pub carrying_capacity: i32,
    pub wealth_in_gold: f64,
    pub spell_slots: [SpellSlotLine; SPELL_SLOT_LEVELS as usize],
}

impl DerivedModel {
    /// Computes the display model. Deterministic; the same record always
    /// yields the same model.
    pub fn compute(character: &Character, engine: &dyn CalculationEngine) -> Self {
        let level = character.level;
        let score = |ability: Ability| character.abilities.get(ability);

        let abilities = Ability::ALL.map(|ability| AbilityLine {
            ability,
            score: score(ability),
            modifier: engine.ability_modifier(score(ability)),
        });

        let saving_throws = Ability::ALL.map(|ability| {
            let proficient = character.saving_throws.get(ability);
            SavingThrowLine {
                ability,
                proficient,
                total: engine.saving_throw_modifier(score(ability), level, proficient),
            }
        });

        let skills = Skill::ALL
            .into_iter()
            .map(|skill| {
                let entry = character.skills.get(skill);
                let proficiency = ProficiencyLevel::from_flags(entry.proficient, entry.expertise);
                SkillLine {
                    skill,
                    ability: skill.ability(),
                    proficiency,
                    total: engine.skill_modifier(score(skill.ability()), level, proficiency),
                }
            })
            .collect();

        let perception = character.skills.get(Skill::Perception);
        let passive_perception = engine.passive_perception(
            score(Ability::Wisdom),
            level,
            ProficiencyLevel::from_flags(perception.proficient, perception.expertise),
        );

        let mut spell_slots = [SpellSlotLine {
            level: 0,
            max: 0,
            used: 0,
            remaining: 0,
        }; SPELL_SLOT_LEVELS as usize];
        for (line, (level, slot)) in spell_slots.iter_mut().zip(character.spell_slots.iter()) {
            *line = SpellSlotLine {
                level,
                max: slot.max,
                used: slot.used,
                remaining: slot.remaining(),
            };
        }

        Self {
            proficiency_bonus: engine.proficiency_bonus(level),
            abilities,
            saving_throws,
            skills,
            passive_perception,
            initiative: engine
                .ability_modifier(score(Ability::Dexterity))
                .saturating_add(character.initiative_misc),
            carrying_capacity: engine.carrying_capacity(score(Ability::Strength)),
            wealth_in_gold: wealth_in_gold(character),
            spell_slots,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities
            .iter()
            .find(|line| line.ability == ability)
            .map(|line| line.modifier)
            .unwrap_or_default()
    }

    pub fn saving_throw(&self, ability: Ability) -> i32 {
        self.saving_throws
            .iter()
            .find(|line| line.ability == ability)
            .map(|line| line.total)
            .unwrap_or_default()
    }

    pub fn skill(&self, skill: Skill) -> i32 {
        self.skills
            .iter()
            .find(|line| line.skill == skill)
            .map(|line| line.total)
            .unwrap_or_default()
    }
}

/// Total coin value expressed in gold pieces.
pub fn wealth_in_gold(character: &Character) -> f64 {
    let c = &character.currency;
    c.cp as f64 / 100.0 + c.sp as f64 / 10.0 + c.ep as f64 * 0.5 + c.gp as f64 + c.pp as f64 * 10.0
}

/// Signed modifier text: `+1`, `+0`, `-1`.
pub fn format_modifier(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// Gold amount with two decimals.
pub fn format_gold(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SpellSlot;
    use crate::game_systems::Dnd5eSystem;

    fn compute(character: &Character) -> DerivedModel {
        DerivedModel::compute(character, &Dnd5eSystem::new())
    }

    #[test]
    fn default_character_derives_baseline() {
        let model = compute(&Character::create_default("Vex"));
        assert_eq!(model.proficiency_bonus, 2);
        assert!(model.abilities.iter().all(|a| a.modifier == 0));
        assert_eq!(model.passive_perception, 10);
        assert_eq!(model.initiative, 0);
        assert_eq!(model.carrying_capacity, 150);
        assert_eq!(model.wealth_in_gold, 0.0);
        assert_eq!(model.skills.len(), 18);
    }

    #[test]
    fn athletics_with_proficiency_at_level_five() {
        let mut c = Character::create_default("Grog");
        c.abilities.strength = 16;
        c.level = 5;
        c.skills.set_proficient(Skill::Athletics, true);

        let model = compute(&c);
        assert_eq!(model.modifier(Ability::Strength), 3);
        assert_eq!(model.skill(Skill::Athletics), 6);
        assert_eq!(model.carrying_capacity, 240);
    }

    #[test]
    fn expertise_doubles_instead_of_adding() {
        let mut c = Character::create_default("Vex");
        c.abilities.dexterity = 14;
        c.skills.set_proficient(Skill::Stealth, true);
        c.skills.set_expertise(Skill::Stealth, true);

        // +2 dex, 2 x 2 proficiency
        assert_eq!(compute(&c).skill(Skill::Stealth), 6);
    }

    #[test]
    fn passive_perception_uses_perception_proficiency() {
        let mut c = Character::create_default("Vex");
        c.abilities.wisdom = 12;
        c.skills.set_proficient(Skill::Perception, true);
        assert_eq!(compute(&c).passive_perception, 13);

        c.skills.set_expertise(Skill::Perception, true);
        assert_eq!(compute(&c).passive_perception, 15);
    }

    #[test]
    fn saving_throw_totals() {
        let mut c = Character::create_default("Vex");
        c.abilities.constitution = 8;
        c.saving_throws.set(Ability::Constitution, true);
        let model = compute(&c);
        assert_eq!(model.saving_throw(Ability::Constitution), 1);
        assert_eq!(model.saving_throw(Ability::Wisdom), 0);
    }

    #[test]
    fn initiative_adds_misc_modifier() {
        let mut c = Character::create_default("Vex");
        c.abilities.dexterity = 7;
        c.initiative_misc = 5;
        assert_eq!(compute(&c).initiative, 3);
    }

    #[test]
    fn wealth_converts_to_gold() {
        let mut c = Character::create_default("Vex");
        c.currency.gp = 10;
        c.currency.sp = 5;
        c.currency.pp = 1;
        let model = compute(&c);
        assert_eq!(format_gold(model.wealth_in_gold), "20.50");

        c.currency.cp = 7;
        c.currency.ep = 3;
        assert_eq!(format_gold(wealth_in_gold(&c)), "22.07");
    }

    #[test]
    fn remaining_spell_slots_do_not_touch_used() {
        let mut c = Character::create_default("Vex");
        if let Some(slot) = c.spell_slots.get_mut(1) {
            *slot = SpellSlot { max: 2, used: 3 };
        }
        let model = compute(&c);
        assert_eq!(model.spell_slots[0].level, 1);
        assert_eq!(model.spell_slots[0].remaining, 0);
        assert_eq!(model.spell_slots[8].level, 9);
        assert_eq!(c.spell_slots.get(1).map(|s| s.used), Some(3));
    }

    #[test]
    fn compute_is_idempotent() {
        let mut c = Character::create_default("Vex");
        c.abilities.charisma = 17;
        let before = c.clone();
        assert_eq!(compute(&c), compute(&c));
        assert_eq!(c, before);
    }

    #[test]
    fn modifier_formatting() {
        assert_eq!(format_modifier(1), "+1");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-1), "-1");
    }
}
