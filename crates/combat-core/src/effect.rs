//! Tagged mutation descriptors produced by actions and applied by the engine.
//!
//! Actions never mutate state directly: execution returns effects, and the
//! engine dispatches them in emission order during `ApplyEffects`. If an
//! effect fails to apply, the remaining effects of that action are dropped
//! while earlier mutations stand, so ordering is part of each action's
//! contract.

use crate::id::CombatantId;
use crate::modifier::ModifiedStat;

/// A single deferred mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Apply hit-point damage to a combatant.
    Damage {
        source_id: CombatantId,
        target_id: CombatantId,
        amount: u32,
    },

    /// Consume one spell slot at `level` from a caster. Fails when the
    /// caster has no remaining slot, stopping the rest of the action.
    ConsumeSlot { caster_id: CombatantId, level: u8 },

    /// Attach a named condition to a combatant.
    ApplyCondition {
        source_id: CombatantId,
        target_id: CombatantId,
        condition_id: String,
        duration: Option<u32>,
    },

    /// Restore hit points. Skipped for dead targets; death is irreversible
    /// within an encounter.
    Heal {
        source_id: CombatantId,
        target_id: CombatantId,
        amount: u32,
    },

    /// Attach a temporary stat modifier to a combatant.
    ApplyModifier {
        source_id: CombatantId,
        target_id: CombatantId,
        modifier_id: String,
        stat: ModifiedStat,
        value: i32,
        duration: u32,
    },
}
