//! Temporary combat stat modifiers with duration tracking.
//!
//! Buff and debuff spells (Shield, Bless) apply modifiers through the effect
//! pipeline; attack resolution consults the per-stat totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::CombatantId;

/// Which combat stat a modifier adjusts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifiedStat {
    Attack,
    Damage,
    ArmorClass,
}

/// An active modifier instance on a specific combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveModifier {
    pub modifier_id: String,
    pub source_id: CombatantId,
    pub stat: ModifiedStat,
    pub value: i32,
    pub remaining_rounds: u32,
}

/// Stores and queries active modifiers per combatant.
///
/// Backed by a `BTreeMap` so expiry events come out in a deterministic order.
#[derive(Debug, Default)]
pub struct ModifierTracker {
    modifiers: BTreeMap<CombatantId, Vec<ActiveModifier>>,
}

impl ModifierTracker {
    pub fn add(&mut self, combatant_id: CombatantId, modifier: ActiveModifier) {
        self.modifiers.entry(combatant_id).or_default().push(modifier);
    }

    /// Sum of active modifiers for one stat on one combatant.
    pub fn total(&self, combatant_id: &CombatantId, stat: ModifiedStat) -> i32 {
        self.modifiers
            .get(combatant_id)
            .map(|mods| {
                mods.iter()
                    .filter(|m| m.stat == stat)
                    .map(|m| m.value)
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn all(&self, combatant_id: &CombatantId) -> &[ActiveModifier] {
        self.modifiers
            .get(combatant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Decrements durations, dropping expired modifiers.
    ///
    /// Returns `(combatant_id, modifier_id)` pairs for every expiry.
    pub fn tick_round(&mut self) -> Vec<(CombatantId, String)> {
        let mut expired = Vec::new();
        for (combatant_id, modifiers) in &mut self.modifiers {
            modifiers.retain_mut(|modifier| {
                modifier.remaining_rounds = modifier.remaining_rounds.saturating_sub(1);
                if modifier.remaining_rounds == 0 {
                    expired.push((combatant_id.clone(), modifier.modifier_id.clone()));
                    false
                } else {
                    true
                }
            });
        }
        expired
    }
}
