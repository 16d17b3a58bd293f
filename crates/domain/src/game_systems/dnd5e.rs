//! D&D 5th Edition game system implementation.
//!
//! Implements the calculation rules and Player's Handbook class tables.

use super::traits::{CalculationEngine, ClassRules, GameSystem, SkillChoices};
use super::vocabulary::{Ability, CharacterClass, Skill};

/// PHB rule: a character is proficient in at most two saving throws.
const SAVING_THROW_CAP: usize = 2;

/// Pounds of carrying capacity per point of strength.
const CARRY_MULTIPLIER: i32 = 15;

const BARBARIAN_SKILLS: &[Skill] = &[
    Skill::AnimalHandling,
    Skill::Athletics,
    Skill::Intimidation,
    Skill::Nature,
    Skill::Perception,
    Skill::Survival,
];

const CLERIC_SKILLS: &[Skill] = &[
    Skill::History,
    Skill::Insight,
    Skill::Medicine,
    Skill::Persuasion,
    Skill::Religion,
];

const DRUID_SKILLS: &[Skill] = &[
    Skill::Arcana,
    Skill::AnimalHandling,
    Skill::Insight,
    Skill::Medicine,
    Skill::Nature,
    Skill::Perception,
    Skill::Religion,
    Skill::Survival,
];

const FIGHTER_SKILLS: &[Skill] = &[
    Skill::Acrobatics,
    Skill::AnimalHandling,
    Skill::Athletics,
    Skill::History,
    Skill::Insight,
    Skill::Intimidation,
    Skill::Perception,
    Skill::Survival,
];

const MONK_SKILLS: &[Skill] = &[
    Skill::Acrobatics,
    Skill::Athletics,
    Skill::History,
    Skill::Insight,
    Skill::Religion,
    Skill::Stealth,
];

const PALADIN_SKILLS: &[Skill] = &[
    Skill::Athletics,
    Skill::Insight,
    Skill::Intimidation,
    Skill::Medicine,
    Skill::Persuasion,
    Skill::Religion,
];

const RANGER_SKILLS: &[Skill] = &[
    Skill::AnimalHandling,
    Skill::Athletics,
    Skill::Insight,
    Skill::Investigation,
    Skill::Nature,
    Skill::Perception,
    Skill::Stealth,
    Skill::Survival,
];

const ROGUE_SKILLS: &[Skill] = &[
    Skill::Acrobatics,
    Skill::Athletics,
    Skill::Deception,
    Skill::Insight,
    Skill::Intimidation,
    Skill::Investigation,
    Skill::Perception,
    Skill::Performance,
    Skill::Persuasion,
    Skill::SleightOfHand,
    Skill::Stealth,
];

const SORCERER_SKILLS: &[Skill] = &[
    Skill::Arcana,
    Skill::Deception,
    Skill::Insight,
    Skill::Intimidation,
    Skill::Persuasion,
    Skill::Religion,
];

const WARLOCK_SKILLS: &[Skill] = &[
    Skill::Arcana,
    Skill::Deception,
    Skill::History,
    Skill::Intimidation,
    Skill::Investigation,
    Skill::Nature,
    Skill::Religion,
];

const WIZARD_SKILLS: &[Skill] = &[
    Skill::Arcana,
    Skill::History,
    Skill::Insight,
    Skill::Investigation,
    Skill::Medicine,
    Skill::Religion,
];

/// D&D 5th Edition game system.
#[derive(Debug, Clone, Copy)]
pub struct Dnd5eSystem;

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Dnd5eSystem {
    /// Create a new D&D 5e system instance.
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for Dnd5eSystem {
    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn class_rules(&self) -> &dyn ClassRules {
        self
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        // Rust's / rounds toward zero; the rule floors.
        score.saturating_sub(10).div_euclid(2)
    }

    fn proficiency_bonus(&self, level: u8) -> i32 {
        match level {
            0..=4 => 2,
            5..=8 => 3,
            9..=12 => 4,
            13..=16 => 5,
            _ => 6,
        }
    }

    fn carrying_capacity(&self, strength: i32) -> i32 {
        strength.saturating_mul(CARRY_MULTIPLIER)
    }
}

impl ClassRules for Dnd5eSystem {
    fn saving_throw_grants(&self, class: CharacterClass) -> &'static [Ability] {
        use Ability::*;
        match class {
            CharacterClass::Barbarian | CharacterClass::Fighter => &[Strength, Constitution],
            CharacterClass::Bard => &[Dexterity, Charisma],
            CharacterClass::Cleric | CharacterClass::Paladin | CharacterClass::Warlock => {
                &[Wisdom, Charisma]
            }
            CharacterClass::Druid | CharacterClass::Wizard => &[Intelligence, Wisdom],
            CharacterClass::Monk | CharacterClass::Ranger => &[Strength, Dexterity],
            CharacterClass::Rogue => &[Dexterity, Intelligence],
            CharacterClass::Sorcerer => &[Constitution, Charisma],
        }
    }

    fn skill_choices(&self, class: CharacterClass) -> SkillChoices {
        match class {
            CharacterClass::Barbarian => SkillChoices::listed(BARBARIAN_SKILLS, 2),
            CharacterClass::Bard => SkillChoices::any(3),
            CharacterClass::Cleric => SkillChoices::listed(CLERIC_SKILLS, 2),
            CharacterClass::Druid => SkillChoices::listed(DRUID_SKILLS, 2),
            CharacterClass::Fighter => SkillChoices::listed(FIGHTER_SKILLS, 2),
            CharacterClass::Monk => SkillChoices::listed(MONK_SKILLS, 2),
            CharacterClass::Paladin => SkillChoices::listed(PALADIN_SKILLS, 2),
            CharacterClass::Ranger => SkillChoices::listed(RANGER_SKILLS, 3),
            CharacterClass::Rogue => SkillChoices::listed(ROGUE_SKILLS, 4),
            CharacterClass::Sorcerer => SkillChoices::listed(SORCERER_SKILLS, 2),
            CharacterClass::Warlock => SkillChoices::listed(WARLOCK_SKILLS, 2),
            CharacterClass::Wizard => SkillChoices::listed(WIZARD_SKILLS, 2),
        }
    }

    fn expertise_slots(&self, class: CharacterClass, level: u8) -> u8 {
        match class {
            CharacterClass::Rogue if level >= 6 => 4,
            CharacterClass::Rogue => 2,
            CharacterClass::Bard if level >= 10 => 4,
            CharacterClass::Bard if level >= 3 => 2,
            _ => 0,
        }
    }

    fn saving_throw_cap(&self) -> usize {
        SAVING_THROW_CAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::{ProficiencyLevel, SkillPool};

    #[test]
    fn ability_modifier_calculation() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.ability_modifier(0), -5);
        assert_eq!(system.ability_modifier(1), -5);
        assert_eq!(system.ability_modifier(3), -4);
        assert_eq!(system.ability_modifier(8), -1);
        assert_eq!(system.ability_modifier(9), -1);
        assert_eq!(system.ability_modifier(10), 0);
        assert_eq!(system.ability_modifier(11), 0);
        assert_eq!(system.ability_modifier(12), 1);
        assert_eq!(system.ability_modifier(16), 3);
        assert_eq!(system.ability_modifier(30), 10);
    }

    #[test]
    fn ability_modifier_matches_floor_formula() {
        let system = Dnd5eSystem::new();
        for score in -40..=40 {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            assert_eq!(system.ability_modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn proficiency_bonus_progression() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.proficiency_bonus(1), 2);
        assert_eq!(system.proficiency_bonus(4), 2);
        assert_eq!(system.proficiency_bonus(5), 3);
        assert_eq!(system.proficiency_bonus(8), 3);
        assert_eq!(system.proficiency_bonus(9), 4);
        assert_eq!(system.proficiency_bonus(12), 4);
        assert_eq!(system.proficiency_bonus(13), 5);
        assert_eq!(system.proficiency_bonus(16), 5);
        assert_eq!(system.proficiency_bonus(17), 6);
        assert_eq!(system.proficiency_bonus(20), 6);
    }

    #[test]
    fn proficiency_bonus_never_decreases() {
        let system = Dnd5eSystem::new();
        for level in 1..20u8 {
            assert!(system.proficiency_bonus(level) <= system.proficiency_bonus(level + 1));
        }
    }

    #[test]
    fn skill_modifier_with_proficiency() {
        let system = Dnd5eSystem::new();
        // STR 16 (+3), level 5 (+3)
        assert_eq!(system.skill_modifier(16, 5, ProficiencyLevel::None), 3);
        assert_eq!(system.skill_modifier(16, 5, ProficiencyLevel::Proficient), 6);
        assert_eq!(system.skill_modifier(16, 5, ProficiencyLevel::Expert), 9);
        assert_eq!(system.saving_throw_modifier(8, 1, true), 1);
        assert_eq!(system.saving_throw_modifier(8, 1, false), -1);
    }

    #[test]
    fn passive_perception() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.passive_perception(10, 1, ProficiencyLevel::None), 10);
        // 10 + WIS mod (1) + proficiency (3) = 14
        assert_eq!(system.passive_perception(12, 5, ProficiencyLevel::Proficient), 14);
        assert_eq!(system.passive_perception(12, 5, ProficiencyLevel::Expert), 17);
    }

    #[test]
    fn carrying_capacity() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.carrying_capacity(16), 240);
        assert_eq!(system.carrying_capacity(0), 0);
        // Imported records can hold any score; the formula is applied as is.
        assert_eq!(system.carrying_capacity(-2), -30);
    }

    #[test]
    fn every_class_grants_two_saves() {
        let system = Dnd5eSystem::new();
        for class in CharacterClass::ALL {
            assert_eq!(system.saving_throw_grants(class).len(), 2, "{}", class);
        }
        assert_eq!(
            system.saving_throw_grants(CharacterClass::Rogue),
            &[Ability::Dexterity, Ability::Intelligence]
        );
    }

    #[test]
    fn skill_choices_by_class() {
        let system = Dnd5eSystem::new();
        let bard = system.skill_choices(CharacterClass::Bard);
        assert_eq!(bard.pool, SkillPool::Any);
        assert_eq!(bard.picks, 3);

        let rogue = system.skill_choices(CharacterClass::Rogue);
        assert_eq!(rogue.picks, 4);
        assert!(rogue.pool.contains(Skill::SleightOfHand));
        assert!(!rogue.pool.contains(Skill::Arcana));

        let ranger = system.skill_choices(CharacterClass::Ranger);
        assert_eq!(ranger.picks, 3);
    }

    #[test]
    fn expertise_slots_by_level() {
        let system = Dnd5eSystem::new();
        assert_eq!(system.expertise_slots(CharacterClass::Rogue, 1), 2);
        assert_eq!(system.expertise_slots(CharacterClass::Rogue, 5), 2);
        assert_eq!(system.expertise_slots(CharacterClass::Rogue, 6), 4);
        assert_eq!(system.expertise_slots(CharacterClass::Bard, 2), 0);
        assert_eq!(system.expertise_slots(CharacterClass::Bard, 3), 2);
        assert_eq!(system.expertise_slots(CharacterClass::Bard, 10), 4);
        assert_eq!(system.expertise_slots(CharacterClass::Fighter, 20), 0);
    }

    #[test]
    fn system_exposes_itself_through_trait_objects() {
        let system = Dnd5eSystem::new();
        let as_system: &dyn GameSystem = &system;
        assert_eq!(as_system.calculation_engine().proficiency_bonus(9), 4);
        assert_eq!(as_system.class_rules().saving_throw_cap(), 2);
    }
}
