//! Morale policy hook and the classic group-morale implementation.
//!
//! The engine's `CheckMorale` state is a pass-through unless a policy is
//! injected. Policies read the immutable view and report structured check
//! outcomes; the engine emits the events and queues forced flee intents for
//! failures. Triggers and thresholds stay inside the policy.

use dice_roller::DiceService;

use crate::id::{CombatantId, Side};
use crate::provider::ProviderError;
use crate::view::CombatView;

/// Outcome of one morale roll for one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoraleCheck {
    pub id: CombatantId,
    pub roll: i32,
    pub threshold: i32,
    pub failed: bool,
}

/// Decides when the opposition checks morale and with what result.
pub trait MoralePolicy {
    fn assess(
        &mut self,
        view: &CombatView,
        dice: &mut dyn DiceService,
    ) -> Result<Vec<MoraleCheck>, ProviderError>;
}

/// Two-trigger group morale: the opposition checks when it takes its first
/// death and again when half the group is down. Each living member rolls 2d6
/// against the shared threshold; rolling above it fails. Two clean passes,
/// or a threshold of 12 and up, make the group immune for the rest of the
/// encounter.
#[derive(Clone, Debug)]
pub struct GroupMoralePolicy {
    threshold: i32,
    first_death_checked: bool,
    half_down_checked: bool,
    checks_passed: u32,
    immune: bool,
}

impl GroupMoralePolicy {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold,
            first_death_checked: false,
            half_down_checked: false,
            checks_passed: 0,
            immune: threshold >= 12,
        }
    }

    fn trigger(&mut self, view: &CombatView) -> bool {
        let total = view
            .combatants
            .iter()
            .filter(|c| c.side == Side::Opposition)
            .count();
        let down = view
            .combatants
            .iter()
            .filter(|c| c.side == Side::Opposition && !c.alive)
            .count();
        if total == 0 || down == 0 {
            return false;
        }

        if !self.first_death_checked {
            self.first_death_checked = true;
            return true;
        }
        if !self.half_down_checked && down * 2 >= total {
            self.half_down_checked = true;
            return true;
        }
        false
    }
}

impl MoralePolicy for GroupMoralePolicy {
    fn assess(
        &mut self,
        view: &CombatView,
        dice: &mut dyn DiceService,
    ) -> Result<Vec<MoraleCheck>, ProviderError> {
        if self.immune || !self.trigger(view) {
            return Ok(Vec::new());
        }

        let mut checks = Vec::new();
        let mut any_failed = false;
        for member in view.living(Side::Opposition) {
            let roll = dice.roll("2d6")?;
            let failed = roll > self.threshold;
            any_failed = any_failed || failed;
            checks.push(MoraleCheck {
                id: member.id.clone(),
                roll,
                threshold: self.threshold,
                failed,
            });
        }

        if !checks.is_empty() && !any_failed {
            self.checks_passed += 1;
            if self.checks_passed >= 2 {
                self.immune = true;
            }
        }
        Ok(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::CombatantView;
    use dice_roller::FixedDice;
    use std::collections::BTreeSet;

    fn view(living_monsters: usize, dead_monsters: usize) -> CombatView {
        let mut combatants = vec![CombatantView {
            id: CombatantId::pc("Mira"),
            name: "Mira".to_string(),
            side: Side::Party,
            alive: true,
            hp: 8,
            max_hp: 8,
            initiative: 4,
        }];
        for index in 0..living_monsters + dead_monsters {
            let alive = index < living_monsters;
            combatants.push(CombatantView {
                id: CombatantId::monster("Goblin", index),
                name: format!("Goblin #{}", index + 1),
                side: Side::Opposition,
                alive,
                hp: if alive { 4 } else { 0 },
                max_hp: 4,
                initiative: 2,
            });
        }
        CombatView {
            round_no: 2,
            current_id: None,
            combatants,
            announced_deaths: BTreeSet::new(),
        }
    }

    #[test]
    fn no_checks_before_the_first_death() {
        let mut policy = GroupMoralePolicy::new(7);
        let mut dice = FixedDice::new(Vec::<i32>::new());
        let checks = policy.assess(&view(3, 0), &mut dice).unwrap();
        assert!(checks.is_empty());
    }

    #[test]
    fn first_death_triggers_one_roll_per_living_member() {
        let mut policy = GroupMoralePolicy::new(7);
        let mut dice = FixedDice::new([6, 9]);
        let checks = policy.assess(&view(2, 1), &mut dice).unwrap();
        assert_eq!(checks.len(), 2);
        assert!(!checks[0].failed);
        assert!(checks[1].failed);
    }

    #[test]
    fn half_down_triggers_a_second_check_only_once() {
        let mut policy = GroupMoralePolicy::new(7);
        let mut dice = FixedDice::new([5, 5, 5, 9, 9]);

        // First death.
        assert_eq!(policy.assess(&view(3, 1), &mut dice).unwrap().len(), 3);
        // Half the group down.
        assert_eq!(policy.assess(&view(2, 2), &mut dice).unwrap().len(), 2);

        // No trigger left; subsequent rounds stay quiet.
        let mut quiet_dice = FixedDice::new(Vec::<i32>::new());
        assert!(policy.assess(&view(1, 3), &mut quiet_dice).unwrap().is_empty());
    }

    #[test]
    fn fearless_groups_never_check() {
        let mut policy = GroupMoralePolicy::new(12);
        let mut dice = FixedDice::new(Vec::<i32>::new());
        assert!(policy.assess(&view(1, 2), &mut dice).unwrap().is_empty());
    }

    #[test]
    fn two_clean_passes_grant_immunity() {
        let mut policy = GroupMoralePolicy::new(9);
        let mut dice = FixedDice::new([4, 4, 4, 5, 5]);

        // First death: three clean passes.
        assert!(policy
            .assess(&view(3, 1), &mut dice)
            .unwrap()
            .iter()
            .all(|c| !c.failed));
        // Half down: two more clean passes, the second clean check.
        assert!(policy
            .assess(&view(2, 2), &mut dice)
            .unwrap()
            .iter()
            .all(|c| !c.failed));

        // Immune now, even as the situation worsens.
        let mut quiet_dice = FixedDice::new(Vec::<i32>::new());
        assert!(policy.assess(&view(1, 3), &mut quiet_dice).unwrap().is_empty());
    }
}
