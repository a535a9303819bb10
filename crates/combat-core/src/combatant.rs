//! The collaborator contract consumed by the engine.
//!
//! The engine never instantiates characters or monsters. It reads stats and
//! applies damage through [`Combatant`], and reaches spell slots through the
//! [`SpellCaster`] capability; content stays outside the rules crate.

use serde::{Deserialize, Serialize};

/// Character class identity used by spell eligibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    Fighter,
    Cleric,
    MagicUser,
    Thief,
    Elf,
    Dwarf,
    Halfling,
}

/// Capability interface satisfied only by combatants that can cast spells.
///
/// Non-casters simply do not expose it (see [`Combatant::as_caster`]), which
/// replaces runtime attribute poking with a static seam.
pub trait SpellCaster {
    /// Class identity checked against a spell's `usable_by` set.
    fn class(&self) -> ClassId;

    /// Maximum spell slots this caster's class and level grant at `level`.
    ///
    /// This is the static table; the engine tracks remaining slots itself.
    fn slots_at(&self, level: u8) -> u32;
}

/// Narrow interface over a party member or monster.
///
/// Liveness is derived from hit points; once a combatant reaches 0 HP the
/// engine treats death as irreversible for the rest of the encounter.
pub trait Combatant {
    fn name(&self) -> &str;

    fn hit_points(&self) -> i32;

    fn max_hit_points(&self) -> i32;

    fn is_alive(&self) -> bool {
        self.hit_points() > 0
    }

    /// Armor class, descending (lower is better).
    fn armor_class(&self) -> i32;

    /// To-hit-AC-0 score used to derive attack thresholds.
    fn thac0(&self) -> i32;

    /// Attacks resolved per combat round. Multi-attack monsters override.
    fn attacks_per_round(&self) -> usize {
        1
    }

    /// Damage notation of the equipped melee weapon (or natural attack).
    fn melee_damage_die(&self) -> &str;

    /// Damage notation of an equipped ranged weapon, if any.
    fn ranged_damage_die(&self) -> Option<&str> {
        None
    }

    fn strength_modifier(&self) -> i32 {
        0
    }

    fn dexterity_modifier(&self) -> i32 {
        0
    }

    /// Applies damage; implementations clamp hit points at 0.
    fn apply_damage(&mut self, amount: u32);

    /// Restores hit points up to the maximum. Never revives the dead; the
    /// engine skips healing effects aimed at corpses.
    fn heal(&mut self, amount: u32);

    /// Spell-casting capability, when present.
    fn as_caster(&self) -> Option<&dyn SpellCaster> {
        None
    }
}
