//! Static spell catalog.
//!
//! This is exemplar data for the combat actions, not a spell DSL: each entry
//! is a flat definition that `CastSpell` validation and execution read at
//! lookup time.

use serde::{Deserialize, Serialize};

use crate::combatant::ClassId;
use crate::modifier::ModifiedStat;

/// How a spell selects its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// One living opponent, named in the intent.
    SingleEnemy,
    /// Every living opponent; resolved at execution time.
    AllEnemies,
    /// The caster. The intent's target list must be empty.
    Caster,
    /// One living member of the caster's own side.
    SingleAlly,
    /// Every living member of the caster's side; resolved at execution time.
    AllAllies,
}

/// A temporary stat modifier granted by a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpellModifier {
    pub modifier_id: &'static str,
    pub stat: ModifiedStat,
    pub value: i32,
    pub duration: u32,
}

/// Static definition of a combat spell looked up by `spell_id`.
///
/// `num_targets` keeps the legacy encoding alongside `target_mode`:
/// `-1` means every living opponent, `1` a single target, `0` the caster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellDefinition {
    pub spell_id: &'static str,
    pub name: &'static str,
    pub level: u8,
    pub usable_by: &'static [ClassId],
    pub damage_die: Option<&'static str>,
    pub heal_die: Option<&'static str>,
    pub num_targets: i32,
    pub auto_hit: bool,
    pub condition_id: Option<&'static str>,
    pub condition_duration: Option<u32>,
    pub target_mode: TargetMode,
    pub modifiers: &'static [SpellModifier],
}

const ARCANE: &[ClassId] = &[ClassId::MagicUser, ClassId::Elf];
const DIVINE: &[ClassId] = &[ClassId::Cleric];
const ARCANE_OR_DIVINE: &[ClassId] = &[ClassId::Cleric, ClassId::MagicUser, ClassId::Elf];

static SPELL_CATALOG: &[SpellDefinition] = &[
    SpellDefinition {
        spell_id: "magic_missile",
        name: "Magic Missile",
        level: 1,
        usable_by: ARCANE,
        damage_die: Some("1d6+1"),
        heal_die: None,
        num_targets: 1,
        auto_hit: true,
        condition_id: None,
        condition_duration: None,
        target_mode: TargetMode::SingleEnemy,
        modifiers: &[],
    },
    SpellDefinition {
        spell_id: "sleep",
        name: "Sleep",
        level: 1,
        usable_by: ARCANE,
        damage_die: None,
        heal_die: None,
        num_targets: -1,
        auto_hit: true,
        condition_id: Some("asleep"),
        condition_duration: None,
        target_mode: TargetMode::AllEnemies,
        modifiers: &[],
    },
    SpellDefinition {
        spell_id: "hold_person",
        name: "Hold Person",
        level: 2,
        usable_by: DIVINE,
        damage_die: None,
        heal_die: None,
        num_targets: 1,
        auto_hit: true,
        condition_id: Some("held"),
        condition_duration: Some(9),
        target_mode: TargetMode::SingleEnemy,
        modifiers: &[],
    },
    SpellDefinition {
        spell_id: "light",
        name: "Light",
        level: 1,
        usable_by: ARCANE_OR_DIVINE,
        damage_die: None,
        heal_die: None,
        num_targets: 1,
        auto_hit: true,
        condition_id: Some("blinded"),
        condition_duration: Some(12),
        target_mode: TargetMode::SingleEnemy,
        modifiers: &[],
    },
    SpellDefinition {
        spell_id: "shield",
        name: "Shield",
        level: 1,
        usable_by: ARCANE,
        damage_die: None,
        heal_die: None,
        num_targets: 0,
        auto_hit: true,
        condition_id: None,
        condition_duration: None,
        target_mode: TargetMode::Caster,
        modifiers: &[SpellModifier {
            modifier_id: "shield_ac",
            stat: ModifiedStat::ArmorClass,
            value: -2,
            duration: 12,
        }],
    },
    SpellDefinition {
        spell_id: "bless",
        name: "Bless",
        level: 2,
        usable_by: DIVINE,
        damage_die: None,
        heal_die: None,
        num_targets: -1,
        auto_hit: true,
        condition_id: None,
        condition_duration: None,
        target_mode: TargetMode::AllAllies,
        modifiers: &[SpellModifier {
            modifier_id: "bless_attack",
            stat: ModifiedStat::Attack,
            value: 1,
            duration: 6,
        }],
    },
    SpellDefinition {
        spell_id: "cure_light_wounds",
        name: "Cure Light Wounds",
        level: 1,
        usable_by: DIVINE,
        damage_die: None,
        heal_die: Some("1d6+1"),
        num_targets: 1,
        auto_hit: true,
        condition_id: None,
        condition_duration: None,
        target_mode: TargetMode::SingleAlly,
        modifiers: &[],
    },
];

/// Looks up a spell definition by id.
pub fn get_spell(spell_id: &str) -> Option<&'static SpellDefinition> {
    SPELL_CATALOG.iter().find(|spell| spell.spell_id == spell_id)
}

/// The full catalog, in registration order.
pub fn all_spells() -> &'static [SpellDefinition] {
    SPELL_CATALOG
}
