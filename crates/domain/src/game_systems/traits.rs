//! Game system traits for ruleset-specific mechanics.
//!
//! The derived-stat calculator and the constraint evaluator only talk to the
//! ruleset through these traits, so the formulas and per-class tables live in
//! one place.

use super::vocabulary::{Ability, CharacterClass, Skill};

/// Core trait a ruleset implements.
pub trait GameSystem: Send + Sync {
    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// Get the per-class grant tables for this system.
    fn class_rules(&self) -> &dyn ClassRules;
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    ///
    /// For D&D-like systems: floor((score - 10) / 2)
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate proficiency bonus from character level.
    fn proficiency_bonus(&self, level: u8) -> i32;

    /// Calculate skill check modifier from the governing score.
    fn skill_modifier(&self, score: i32, level: u8, proficiency_level: ProficiencyLevel) -> i32 {
        self.ability_modifier(score) + proficiency_level.bonus(self.proficiency_bonus(level))
    }

    /// Calculate saving throw modifier.
    fn saving_throw_modifier(&self, score: i32, level: u8, proficient: bool) -> i32 {
        self.skill_modifier(score, level, ProficiencyLevel::from_flags(proficient, false))
    }

    /// Calculate passive perception from wisdom.
    fn passive_perception(&self, wisdom: i32, level: u8, proficiency_level: ProficiencyLevel) -> i32 {
        10 + self.skill_modifier(wisdom, level, proficiency_level)
    }

    /// Carrying capacity in pounds.
    fn carrying_capacity(&self, strength: i32) -> i32;
}

/// Per-class grants: saving throws, skill choices and expertise slots.
pub trait ClassRules: Send + Sync {
    /// Saving throws a class makes proficient.
    fn saving_throw_grants(&self, class: CharacterClass) -> &'static [Ability];

    /// The skills a class may choose from and how many.
    fn skill_choices(&self, class: CharacterClass) -> SkillChoices;

    /// Expertise slots a class has at a level. Zero when the class grants none.
    fn expertise_slots(&self, class: CharacterClass, level: u8) -> u8;

    /// Maximum number of proficient saving throws.
    fn saving_throw_cap(&self) -> usize;
}

/// Proficiency level for skills and saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProficiencyLevel {
    /// Not proficient
    #[default]
    None,
    /// Standard proficiency
    Proficient,
    /// Expertise (double proficiency)
    Expert,
}

impl ProficiencyLevel {
    /// Build from the stored flags. Expertise wins over plain proficiency.
    pub fn from_flags(proficient: bool, expertise: bool) -> Self {
        match (proficient, expertise) {
            (_, true) => ProficiencyLevel::Expert,
            (true, false) => ProficiencyLevel::Proficient,
            (false, false) => ProficiencyLevel::None,
        }
    }

    /// Get the multiplier for this proficiency level.
    pub fn multiplier(&self) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Proficient => 1,
            ProficiencyLevel::Expert => 2,
        }
    }

    /// Bonus contributed at the given proficiency bonus.
    pub fn bonus(&self, proficiency_bonus: i32) -> i32 {
        proficiency_bonus * self.multiplier()
    }
}

/// Which skills a class can pick proficiency in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillPool {
    /// Any of the eighteen skills.
    Any,
    /// Only the listed skills.
    Listed(&'static [Skill]),
}

impl SkillPool {
    pub fn contains(&self, skill: Skill) -> bool {
        match self {
            SkillPool::Any => true,
            SkillPool::Listed(skills) => skills.contains(&skill),
        }
    }
}

/// A class's skill pool and pick limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillChoices {
    pub pool: SkillPool,
    pub picks: usize,
}

impl SkillChoices {
    pub const fn any(picks: usize) -> Self {
        Self {
            pool: SkillPool::Any,
            picks,
        }
    }

    pub const fn listed(skills: &'static [Skill], picks: usize) -> Self {
        Self {
            pool: SkillPool::Listed(skills),
            picks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proficiency_flags_are_exclusive_multipliers() {
        assert_eq!(ProficiencyLevel::from_flags(false, false), ProficiencyLevel::None);
        assert_eq!(ProficiencyLevel::from_flags(true, false), ProficiencyLevel::Proficient);
        assert_eq!(ProficiencyLevel::from_flags(true, true), ProficiencyLevel::Expert);
        assert_eq!(ProficiencyLevel::Expert.bonus(3), 6);
        assert_eq!(ProficiencyLevel::Proficient.bonus(3), 3);
        assert_eq!(ProficiencyLevel::None.bonus(3), 0);
    }

    #[test]
    fn listed_pool_only_contains_its_skills() {
        let pool = SkillPool::Listed(&[Skill::Stealth, Skill::Arcana]);
        assert!(pool.contains(Skill::Stealth));
        assert!(!pool.contains(Skill::Athletics));
        assert!(SkillPool::Any.contains(Skill::Athletics));
    }
}
