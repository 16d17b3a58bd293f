//! Constraint evaluator
//!
//! Decides, for the current state of a record, which saving-throw and skill
//! toggles are forced, locked, free or disabled, and accepts or rejects a
//! proposed edit before it is applied.

use serde::Serialize;
use thiserror::Error;

use super::update::CharacterUpdate;
use crate::entities::{Character, SPELL_SLOT_LEVELS};
use crate::game_systems::{Ability, CharacterClass, ClassRules, Skill, SkillChoices, SkillPool};
use crate::value_objects::SheetSettings;

/// A hard rule an edit would break. The edit is not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("You can only be proficient in {cap} saving throws")]
    SavingThrowCap { cap: usize },

    #[error("{ability} saving throw is granted by {class} and cannot be removed")]
    ClassLockedSave {
        ability: Ability,
        class: CharacterClass,
    },

    #[error("{skill} is not on the {class} skill list")]
    SkillOutsideClassList { skill: Skill, class: CharacterClass },

    #[error("{class} can only choose {limit} skills")]
    SkillPickLimit { class: CharacterClass, limit: usize },

    #[error("{skill} requires proficiency first")]
    ExpertiseRequiresProficiency { skill: Skill },

    #[error("{class} has only {slots} expertise slots at this level")]
    ExpertiseSlotsExhausted { class: CharacterClass, slots: u8 },

    #[error("No attack at position {index} (there are {len})")]
    UnknownAttack { index: usize, len: usize },

    #[error("Spell slot level must be between 1 and {max}, got {level}", max = SPELL_SLOT_LEVELS)]
    InvalidSpellSlotLevel { level: u8 },

    #[error("Death save box must be 0, 1 or 2, got {index}")]
    InvalidDeathSaveIndex { index: usize },
}

/// A soft rule: the edit is applied, but the user should know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditWarning {
    #[error("{} does not normally grant expertise", class_label(.class))]
    ExpertiseNotGranted { class: Option<CharacterClass> },
}

fn class_label(class: &Option<CharacterClass>) -> &'static str {
    class.map(CharacterClass::name).unwrap_or("A character without a class")
}

/// Why a control cannot be toggled right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisabledReason {
    SavingThrowCap,
    OutsideClassList,
    PickLimit,
    NeedsProficiency,
    ExpertiseSlots,
}

/// Editability of one checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "reason")]
pub enum ControlState {
    /// Forced on by the class and cannot be unchecked.
    Locked,
    /// Granted by the class, but the override setting lets it be toggled.
    Unlockable,
    Free,
    Disabled(DisabledReason),
}

impl ControlState {
    pub fn is_editable(&self) -> bool {
        matches!(self, ControlState::Unlockable | ControlState::Free)
    }
}

/// A checkbox: its stored value plus whether it can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub checked: bool,
    pub state: ControlState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrowControl {
    pub ability: Ability,
    pub granted: bool,
    pub control: Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillControl {
    pub skill: Skill,
    pub in_class_list: bool,
    pub proficiency: Control,
    pub expertise: Control,
}

/// `used` of `limit` counter for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub used: usize,
    pub limit: usize,
}

/// Per-control state for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintModel {
    pub class: Option<CharacterClass>,
    pub granted_saves: Vec<Ability>,
    pub class_override: bool,
    pub saving_throws: Vec<SavingThrowControl>,
    pub saving_throw_tally: Tally,
    pub skills: Vec<SkillControl>,
    /// `None` when the class does not restrict skills.
    pub skill_tally: Option<Tally>,
    /// `None` when the class grants no expertise at this level.
    pub expertise_tally: Option<Tally>,
}

impl ConstraintModel {
    pub fn evaluate(
        character: &Character,
        rules: &dyn ClassRules,
        settings: &SheetSettings,
    ) -> Self {
        let ctx = Evaluator::new(character, rules, settings);

        let saving_throws = Ability::ALL
            .into_iter()
            .map(|ability| SavingThrowControl {
                ability,
                granted: ctx.is_granted(ability),
                control: ctx.saving_throw_control(ability),
            })
            .collect();

        let skills = Skill::ALL
            .into_iter()
            .map(|skill| SkillControl {
                skill,
                in_class_list: ctx.pool().contains(skill),
                proficiency: ctx.proficiency_control(skill),
                expertise: ctx.expertise_control(skill),
            })
            .collect();

        Self {
            class: character.class,
            granted_saves: ctx.granted().to_vec(),
            class_override: settings.allow_class_override,
            saving_throws,
            saving_throw_tally: Tally {
                used: character.saving_throws.count(),
                limit: rules.saving_throw_cap(),
            },
            skills,
            skill_tally: ctx.choices.map(|choices| Tally {
                used: ctx.picked_skills(),
                limit: choices.picks,
            }),
            expertise_tally: (ctx.expertise_slots > 0).then(|| Tally {
                used: character.skills.expertise_count(),
                limit: usize::from(ctx.expertise_slots),
            }),
        }
    }

    /// Badge text listing the class-granted saving throws.
    pub fn save_badge(&self) -> Option<String> {
        let class = self.class?;
        let names: Vec<&str> = self.granted_saves.iter().map(|a| a.abbreviation()).collect();
        let suffix = if self.class_override { " (override on)" } else { "" };
        Some(format!("{} saves: {}{}", class, names.join(", "), suffix))
    }

    pub fn saving_throw(&self, ability: Ability) -> Option<&SavingThrowControl> {
        self.saving_throws.iter().find(|c| c.ability == ability)
    }

    pub fn skill(&self, skill: Skill) -> Option<&SkillControl> {
        self.skills.iter().find(|c| c.skill == skill)
    }
}

/// Checks a proposed edit against the current record.
///
/// `Ok(Some(_))` means the edit is allowed but carries a warning.
pub fn validate(
    character: &Character,
    rules: &dyn ClassRules,
    settings: &SheetSettings,
    update: &CharacterUpdate,
) -> Result<Option<EditWarning>, ConstraintViolation> {
    let ctx = Evaluator::new(character, rules, settings);

    match update {
        CharacterUpdate::SetSavingThrow(ability, checked) => {
            ctx.check_saving_throw(*ability, *checked)?;
            Ok(None)
        }
        CharacterUpdate::SetSkillProficiency(skill, checked) => {
            ctx.check_proficiency(*skill, *checked)?;
            Ok(None)
        }
        CharacterUpdate::SetSkillExpertise(skill, checked) => {
            ctx.check_expertise(*skill, *checked)
        }
        CharacterUpdate::SetClass(Some(class)) if character.class != Some(*class) => {
            ctx.check_class_change(*class)?;
            Ok(None)
        }
        CharacterUpdate::RemoveAttack(index)
        | CharacterUpdate::SetAttackField { index, .. } => {
            let len = character.attacks.len();
            if *index < len {
                Ok(None)
            } else {
                Err(ConstraintViolation::UnknownAttack { index: *index, len })
            }
        }
        CharacterUpdate::SetSpellSlotMax { level, .. }
        | CharacterUpdate::SetSpellSlotUsed { level, .. } => {
            if character.spell_slots.get(*level).is_some() {
                Ok(None)
            } else {
                Err(ConstraintViolation::InvalidSpellSlotLevel { level: *level })
            }
        }
        CharacterUpdate::SetDeathSave { index, .. } => {
            if *index < 3 {
                Ok(None)
            } else {
                Err(ConstraintViolation::InvalidDeathSaveIndex { index: *index })
            }
        }
        _ => Ok(None),
    }
}

/// Counts and lookups shared by evaluation and validation.
struct Evaluator<'a> {
    character: &'a Character,
    rules: &'a dyn ClassRules,
    settings: &'a SheetSettings,
    choices: Option<SkillChoices>,
    expertise_slots: u8,
}

impl<'a> Evaluator<'a> {
    fn new(character: &'a Character, rules: &'a dyn ClassRules, settings: &'a SheetSettings) -> Self {
        Self {
            character,
            rules,
            settings,
            choices: character.class.map(|c| rules.skill_choices(c)),
            expertise_slots: character
                .class
                .map(|c| rules.expertise_slots(c, character.level))
                .unwrap_or(0),
        }
    }

    fn granted(&self) -> &'static [Ability] {
        match self.character.class {
            Some(class) => self.rules.saving_throw_grants(class),
            None => &[],
        }
    }

    fn is_granted(&self, ability: Ability) -> bool {
        self.granted().contains(&ability)
    }

    fn saves_full(&self) -> bool {
        self.character.saving_throws.count() >= self.rules.saving_throw_cap()
    }

    fn pool(&self) -> SkillPool {
        self.choices.map(|c| c.pool).unwrap_or(SkillPool::Any)
    }

    /// Proficient skills that count against the class pick limit.
    fn picked_skills(&self) -> usize {
        let pool = self.pool();
        self.character
            .skills
            .iter()
            .filter(|(skill, entry)| entry.proficient && pool.contains(*skill))
            .count()
    }

    /// Existing proficiencies must fit the new class's pick limit.
    fn check_class_change(&self, class: CharacterClass) -> Result<(), ConstraintViolation> {
        let choices = self.rules.skill_choices(class);
        let picked = self
            .character
            .skills
            .iter()
            .filter(|(skill, entry)| entry.proficient && choices.pool.contains(*skill))
            .count();
        if picked > choices.picks {
            return Err(ConstraintViolation::SkillPickLimit {
                class,
                limit: choices.picks,
            });
        }
        Ok(())
    }

    fn picks_full(&self) -> bool {
        self.choices
            .is_some_and(|choices| self.picked_skills() >= choices.picks)
    }

    fn expertise_full(&self) -> bool {
        self.expertise_slots > 0
            && self.character.skills.expertise_count() >= usize::from(self.expertise_slots)
    }

    fn saving_throw_control(&self, ability: Ability) -> Control {
        let checked = self.character.saving_throws.get(ability);
        let state = if self.is_granted(ability) && !self.settings.allow_class_override {
            ControlState::Locked
        } else if !checked && self.saves_full() {
            ControlState::Disabled(DisabledReason::SavingThrowCap)
        } else if self.is_granted(ability) {
            ControlState::Unlockable
        } else {
            ControlState::Free
        };
        Control { checked, state }
    }

    fn proficiency_control(&self, skill: Skill) -> Control {
        let checked = self.character.skills.get(skill).proficient;
        let state = if !self.pool().contains(skill) {
            ControlState::Disabled(DisabledReason::OutsideClassList)
        } else if !checked && self.picks_full() {
            ControlState::Disabled(DisabledReason::PickLimit)
        } else {
            ControlState::Free
        };
        Control { checked, state }
    }

    fn expertise_control(&self, skill: Skill) -> Control {
        let entry = self.character.skills.get(skill);
        let state = if !entry.proficient {
            ControlState::Disabled(DisabledReason::NeedsProficiency)
        } else if !entry.expertise && self.expertise_full() {
            ControlState::Disabled(DisabledReason::ExpertiseSlots)
        } else {
            ControlState::Free
        };
        Control {
            checked: entry.expertise,
            state,
        }
    }

    fn check_saving_throw(&self, ability: Ability, checked: bool) -> Result<(), ConstraintViolation> {
        let current = self.character.saving_throws.get(ability);
        if checked == current {
            return Ok(());
        }
        if checked && self.saves_full() {
            return Err(ConstraintViolation::SavingThrowCap {
                cap: self.rules.saving_throw_cap(),
            });
        }
        if !checked && !self.settings.allow_class_override {
            if let Some(class) = self.character.class.filter(|_| self.is_granted(ability)) {
                return Err(ConstraintViolation::ClassLockedSave { ability, class });
            }
        }
        Ok(())
    }

    fn check_proficiency(&self, skill: Skill, checked: bool) -> Result<(), ConstraintViolation> {
        let current = self.character.skills.get(skill).proficient;
        if checked == current {
            return Ok(());
        }
        let (Some(class), Some(choices)) = (self.character.class, self.choices) else {
            return Ok(());
        };
        if !choices.pool.contains(skill) {
            return Err(ConstraintViolation::SkillOutsideClassList { skill, class });
        }
        if checked && self.picks_full() {
            return Err(ConstraintViolation::SkillPickLimit {
                class,
                limit: choices.picks,
            });
        }
        Ok(())
    }

    fn check_expertise(
        &self,
        skill: Skill,
        checked: bool,
    ) -> Result<Option<EditWarning>, ConstraintViolation> {
        let entry = self.character.skills.get(skill);
        if !checked || entry.expertise {
            return Ok(None);
        }
        if !entry.proficient {
            return Err(ConstraintViolation::ExpertiseRequiresProficiency { skill });
        }
        match self.character.class {
            Some(class) if self.expertise_slots > 0 => {
                if self.expertise_full() {
                    Err(ConstraintViolation::ExpertiseSlotsExhausted {
                        class,
                        slots: self.expertise_slots,
                    })
                } else {
                    Ok(None)
                }
            }
            class => Ok(Some(EditWarning::ExpertiseNotGranted { class })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::Dnd5eSystem;

    const LOCKED: SheetSettings = SheetSettings {
        allow_class_override: false,
    };
    const OVERRIDE: SheetSettings = SheetSettings {
        allow_class_override: true,
    };

    fn character(class: Option<CharacterClass>) -> Character {
        let mut c = Character::create_default("Test");
        c.class = class;
        c.apply_class_defaults(&Dnd5eSystem::new());
        c
    }

    fn check(
        c: &Character,
        settings: &SheetSettings,
        update: CharacterUpdate,
    ) -> Result<Option<EditWarning>, ConstraintViolation> {
        validate(c, &Dnd5eSystem::new(), settings, &update)
    }

    fn evaluate(c: &Character, settings: &SheetSettings) -> ConstraintModel {
        ConstraintModel::evaluate(c, &Dnd5eSystem::new(), settings)
    }

    #[test]
    fn class_saves_are_locked_without_override() {
        let c = character(Some(CharacterClass::Rogue));
        let model = evaluate(&c, &LOCKED);

        let dex = model.saving_throw(Ability::Dexterity).map(|s| s.control);
        assert_eq!(
            dex,
            Some(Control {
                checked: true,
                state: ControlState::Locked
            })
        );
        assert_eq!(model.save_badge().as_deref(), Some("Rogue saves: DEX, INT"));

        let err = check(&c, &LOCKED, CharacterUpdate::SetSavingThrow(Ability::Dexterity, false));
        assert_eq!(
            err,
            Err(ConstraintViolation::ClassLockedSave {
                ability: Ability::Dexterity,
                class: CharacterClass::Rogue
            })
        );
    }

    #[test]
    fn class_saves_unlock_with_override() {
        let c = character(Some(CharacterClass::Rogue));
        let model = evaluate(&c, &OVERRIDE);
        let dex = model.saving_throw(Ability::Dexterity).map(|s| s.control.state);
        assert_eq!(dex, Some(ControlState::Unlockable));
        assert_eq!(
            check(&c, &OVERRIDE, CharacterUpdate::SetSavingThrow(Ability::Dexterity, false)),
            Ok(None)
        );
    }

    #[test]
    fn third_saving_throw_is_rejected_and_disabled() {
        let c = character(Some(CharacterClass::Wizard));
        assert_eq!(c.saving_throws.count(), 2);

        let result = check(&c, &LOCKED, CharacterUpdate::SetSavingThrow(Ability::Strength, true));
        assert_eq!(result, Err(ConstraintViolation::SavingThrowCap { cap: 2 }));

        let model = evaluate(&c, &LOCKED);
        let str_state = model.saving_throw(Ability::Strength).map(|s| s.control.state);
        assert_eq!(
            str_state,
            Some(ControlState::Disabled(DisabledReason::SavingThrowCap))
        );
        assert!(result
            .err()
            .map(|e| e.to_string().contains('2'))
            .unwrap_or(false));
    }

    #[test]
    fn cap_applies_without_class() {
        let mut c = character(None);
        c.saving_throws.set(Ability::Strength, true);
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSavingThrow(Ability::Wisdom, true)),
            Ok(None)
        );
        c.saving_throws.set(Ability::Wisdom, true);
        assert!(check(&c, &LOCKED, CharacterUpdate::SetSavingThrow(Ability::Charisma, true)).is_err());
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSavingThrow(Ability::Wisdom, false)),
            Ok(None)
        );
    }

    #[test]
    fn rechecking_granted_save_respects_cap_under_override() {
        let mut c = character(Some(CharacterClass::Rogue));
        c.saving_throws.set(Ability::Dexterity, false);
        c.saving_throws.set(Ability::Wisdom, true);
        assert_eq!(
            check(&c, &OVERRIDE, CharacterUpdate::SetSavingThrow(Ability::Dexterity, true)),
            Err(ConstraintViolation::SavingThrowCap { cap: 2 })
        );
    }

    #[test]
    fn skill_outside_class_list_is_not_grantable() {
        let c = character(Some(CharacterClass::Wizard));
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(Skill::Stealth, true)),
            Err(ConstraintViolation::SkillOutsideClassList {
                skill: Skill::Stealth,
                class: CharacterClass::Wizard
            })
        );
        let model = evaluate(&c, &LOCKED);
        let stealth = model.skill(Skill::Stealth).map(|s| s.proficiency);
        assert_eq!(
            stealth,
            Some(Control {
                checked: false,
                state: ControlState::Disabled(DisabledReason::OutsideClassList)
            })
        );
    }

    #[test]
    fn external_proficiency_outside_list_stays_locked_on() {
        let mut c = character(Some(CharacterClass::Wizard));
        c.skills.set_proficient(Skill::Stealth, true);

        let model = evaluate(&c, &LOCKED);
        let stealth = model.skill(Skill::Stealth).map(|s| s.proficiency);
        assert_eq!(
            stealth,
            Some(Control {
                checked: true,
                state: ControlState::Disabled(DisabledReason::OutsideClassList)
            })
        );
        assert!(check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(Skill::Stealth, false)).is_err());
        // Does not count against the pick limit.
        assert_eq!(model.skill_tally, Some(Tally { used: 0, limit: 2 }));
    }

    #[test]
    fn pick_limit_disables_remaining_class_skills() {
        let mut c = character(Some(CharacterClass::Wizard));
        c.skills.set_proficient(Skill::Arcana, true);
        c.skills.set_proficient(Skill::History, true);

        let result = check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(Skill::Insight, true));
        assert_eq!(
            result,
            Err(ConstraintViolation::SkillPickLimit {
                class: CharacterClass::Wizard,
                limit: 2
            })
        );
        assert_eq!(
            result.err().map(|e| e.to_string()).as_deref(),
            Some("Wizard can only choose 2 skills")
        );

        let model = evaluate(&c, &LOCKED);
        assert_eq!(
            model.skill(Skill::Insight).map(|s| s.proficiency.state),
            Some(ControlState::Disabled(DisabledReason::PickLimit))
        );
        assert_eq!(
            model.skill(Skill::Arcana).map(|s| s.proficiency.state),
            Some(ControlState::Free)
        );
        // Unchecking frees a pick.
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(Skill::Arcana, false)),
            Ok(None)
        );
    }

    #[test]
    fn class_change_respects_existing_picks() {
        let mut c = character(None);
        for skill in [Skill::Arcana, Skill::History, Skill::Insight, Skill::Medicine] {
            c.skills.set_proficient(skill, true);
        }
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetClass(Some(CharacterClass::Wizard))),
            Err(ConstraintViolation::SkillPickLimit {
                class: CharacterClass::Wizard,
                limit: 2
            })
        );
        // Bard picks 3 from any skill.
        assert!(check(&c, &LOCKED, CharacterUpdate::SetClass(Some(CharacterClass::Bard))).is_err());
        // None of them are on the Barbarian list.
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetClass(Some(CharacterClass::Barbarian))),
            Ok(None)
        );
        assert_eq!(check(&c, &LOCKED, CharacterUpdate::SetClass(None)), Ok(None));

        c.skills.set_proficient(Skill::Insight, false);
        c.skills.set_proficient(Skill::Medicine, false);
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetClass(Some(CharacterClass::Wizard))),
            Ok(None)
        );
    }

    #[test]
    fn bard_picks_from_any_skill() {
        let c = character(Some(CharacterClass::Bard));
        for skill in [Skill::Stealth, Skill::Athletics, Skill::Arcana] {
            assert_eq!(
                check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(skill, true)),
                Ok(None)
            );
        }
    }

    #[test]
    fn no_class_means_no_skill_restrictions() {
        let mut c = character(None);
        for skill in Skill::ALL.into_iter().take(6) {
            c.skills.set_proficient(skill, true);
        }
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillProficiency(Skill::Survival, true)),
            Ok(None)
        );
        assert_eq!(evaluate(&c, &LOCKED).skill_tally, None);
    }

    #[test]
    fn expertise_requires_proficiency() {
        let c = character(Some(CharacterClass::Rogue));
        let result = check(&c, &LOCKED, CharacterUpdate::SetSkillExpertise(Skill::Stealth, true));
        assert_eq!(
            result,
            Err(ConstraintViolation::ExpertiseRequiresProficiency {
                skill: Skill::Stealth
            })
        );
        assert!(result
            .err()
            .map(|e| e.to_string().contains("requires proficiency first"))
            .unwrap_or(false));
    }

    #[test]
    fn rogue_expertise_slots_by_level() {
        let mut c = character(Some(CharacterClass::Rogue));
        for skill in [Skill::Stealth, Skill::Deception, Skill::Perception] {
            c.skills.set_proficient(skill, true);
        }
        c.skills.set_expertise(Skill::Stealth, true);
        c.skills.set_expertise(Skill::Deception, true);

        let model = evaluate(&c, &LOCKED);
        assert_eq!(model.expertise_tally, Some(Tally { used: 2, limit: 2 }));
        assert_eq!(
            model.skill(Skill::Perception).map(|s| s.expertise.state),
            Some(ControlState::Disabled(DisabledReason::ExpertiseSlots))
        );
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillExpertise(Skill::Perception, true)),
            Err(ConstraintViolation::ExpertiseSlotsExhausted {
                class: CharacterClass::Rogue,
                slots: 2
            })
        );

        c.level = 6;
        assert_eq!(evaluate(&c, &LOCKED).expertise_tally, Some(Tally { used: 2, limit: 4 }));
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillExpertise(Skill::Perception, true)),
            Ok(None)
        );
    }

    #[test]
    fn expertise_without_class_grant_warns() {
        let mut c = character(Some(CharacterClass::Fighter));
        c.skills.set_proficient(Skill::Athletics, true);
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSkillExpertise(Skill::Athletics, true)),
            Ok(Some(EditWarning::ExpertiseNotGranted {
                class: Some(CharacterClass::Fighter)
            }))
        );

        // A level 1 bard has no slots yet.
        let mut bard = character(Some(CharacterClass::Bard));
        bard.skills.set_proficient(Skill::Performance, true);
        assert!(matches!(
            check(&bard, &LOCKED, CharacterUpdate::SetSkillExpertise(Skill::Performance, true)),
            Ok(Some(_))
        ));
        assert_eq!(evaluate(&bard, &LOCKED).expertise_tally, None);
    }

    #[test]
    fn structural_edits_are_bounds_checked() {
        let c = character(None);
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::RemoveAttack(0)),
            Err(ConstraintViolation::UnknownAttack { index: 0, len: 0 })
        );
        assert!(check(
            &c,
            &LOCKED,
            CharacterUpdate::SetSpellSlotUsed { level: 10, used: 1 }
        )
        .is_err());
        assert!(check(
            &c,
            &LOCKED,
            CharacterUpdate::SetSpellSlotMax { level: 0, max: 1 }
        )
        .is_err());
        assert_eq!(
            check(&c, &LOCKED, CharacterUpdate::SetSpellSlotMax { level: 9, max: 1 }),
            Ok(None)
        );
        assert!(check(
            &c,
            &LOCKED,
            CharacterUpdate::SetDeathSave {
                kind: crate::entities::DeathSaveKind::Failure,
                index: 3,
                checked: true
            }
        )
        .is_err());
    }
}
