//! Condition tracking: turn-skip enforcement, durations, break-on-damage.

use std::collections::BTreeMap;

use crate::id::CombatantId;

/// Static flags describing how a condition type behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConditionBehavior {
    pub skip_turn: bool,
    pub break_on_damage: bool,
}

/// Behavior of a condition id. Unknown ids get inert defaults.
pub fn condition_behavior(condition_id: &str) -> ConditionBehavior {
    match condition_id {
        "held" => ConditionBehavior {
            skip_turn: true,
            break_on_damage: false,
        },
        "asleep" => ConditionBehavior {
            skip_turn: true,
            break_on_damage: true,
        },
        _ => ConditionBehavior::default(),
    }
}

/// An active condition instance on a specific combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveCondition {
    pub condition_id: String,
    pub source_id: CombatantId,
    /// `None` means the condition lasts until removed.
    pub remaining_rounds: Option<u32>,
    pub skip_turn: bool,
    pub break_on_damage: bool,
}

/// Stores and queries active conditions per combatant.
#[derive(Debug, Default)]
pub struct ConditionTracker {
    conditions: BTreeMap<CombatantId, Vec<ActiveCondition>>,
}

impl ConditionTracker {
    pub fn add(&mut self, target_id: CombatantId, condition: ActiveCondition) {
        self.conditions.entry(target_id).or_default().push(condition);
    }

    pub fn has(&self, target_id: &CombatantId, condition_id: &str) -> bool {
        self.conditions
            .get(target_id)
            .map(|list| list.iter().any(|c| c.condition_id == condition_id))
            .unwrap_or(false)
    }

    pub fn all(&self, target_id: &CombatantId) -> &[ActiveCondition] {
        self.conditions
            .get(target_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Condition id of the first turn-skipping condition, if any.
    pub fn skip_reason(&self, target_id: &CombatantId) -> Option<String> {
        self.conditions.get(target_id).and_then(|list| {
            list.iter()
                .find(|c| c.skip_turn)
                .map(|c| c.condition_id.clone())
        })
    }

    /// Decrements timed durations, dropping expired conditions.
    ///
    /// Returns `(combatant_id, condition_id)` pairs for every expiry.
    pub fn tick_round(&mut self) -> Vec<(CombatantId, String)> {
        let mut expired = Vec::new();
        for (target_id, conditions) in &mut self.conditions {
            conditions.retain_mut(|condition| match condition.remaining_rounds {
                Some(rounds) => {
                    let rounds = rounds.saturating_sub(1);
                    if rounds == 0 {
                        expired.push((target_id.clone(), condition.condition_id.clone()));
                        false
                    } else {
                        condition.remaining_rounds = Some(rounds);
                        true
                    }
                }
                None => true,
            });
        }
        expired
    }

    /// Removes every break-on-damage condition from a combatant.
    ///
    /// Returns the removed condition ids.
    pub fn break_on_damage(&mut self, target_id: &CombatantId) -> Vec<String> {
        let mut removed = Vec::new();
        if let Some(conditions) = self.conditions.get_mut(target_id) {
            conditions.retain(|condition| {
                if condition.break_on_damage {
                    removed.push(condition.condition_id.clone());
                    false
                } else {
                    true
                }
            });
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(condition_id: &str, rounds: Option<u32>) -> ActiveCondition {
        let behavior = condition_behavior(condition_id);
        ActiveCondition {
            condition_id: condition_id.to_string(),
            source_id: CombatantId::pc("Zil"),
            remaining_rounds: rounds,
            skip_turn: behavior.skip_turn,
            break_on_damage: behavior.break_on_damage,
        }
    }

    #[test]
    fn registry_flags_match_the_rules() {
        assert!(condition_behavior("held").skip_turn);
        assert!(!condition_behavior("held").break_on_damage);
        assert!(condition_behavior("asleep").skip_turn);
        assert!(condition_behavior("asleep").break_on_damage);
        assert_eq!(condition_behavior("blinded"), ConditionBehavior::default());
    }

    #[test]
    fn skip_reason_reports_first_skipping_condition() {
        let mut tracker = ConditionTracker::default();
        let goblin = CombatantId::monster("Goblin", 0);
        tracker.add(goblin.clone(), active("blinded", Some(12)));
        assert_eq!(tracker.skip_reason(&goblin), None);

        tracker.add(goblin.clone(), active("held", Some(9)));
        assert_eq!(tracker.skip_reason(&goblin), Some("held".to_string()));
    }

    #[test]
    fn permanent_conditions_survive_round_ticks() {
        let mut tracker = ConditionTracker::default();
        let goblin = CombatantId::monster("Goblin", 0);
        tracker.add(goblin.clone(), active("asleep", None));

        assert!(tracker.tick_round().is_empty());
        assert!(tracker.has(&goblin, "asleep"));
    }

    #[test]
    fn timed_conditions_expire() {
        let mut tracker = ConditionTracker::default();
        let goblin = CombatantId::monster("Goblin", 0);
        tracker.add(goblin.clone(), active("held", Some(1)));

        let expired = tracker.tick_round();
        assert_eq!(expired, vec![(goblin.clone(), "held".to_string())]);
        assert!(!tracker.has(&goblin, "held"));
    }

    #[test]
    fn damage_breaks_sleep_but_not_hold() {
        let mut tracker = ConditionTracker::default();
        let goblin = CombatantId::monster("Goblin", 0);
        tracker.add(goblin.clone(), active("asleep", None));
        tracker.add(goblin.clone(), active("held", Some(9)));

        let removed = tracker.break_on_damage(&goblin);
        assert_eq!(removed, vec!["asleep".to_string()]);
        assert!(tracker.has(&goblin, "held"));
    }
}
