//! Shared combatant fixtures for the integration suites.
#![allow(dead_code)]

use combat_core::{ClassId, Combatant, SpellCaster};

/// Spell-casting capability attached to a test combatant.
pub struct CasterProfile {
    class: ClassId,
    slots: Vec<(u8, u32)>,
}

impl SpellCaster for CasterProfile {
    fn class(&self) -> ClassId {
        self.class
    }

    fn slots_at(&self, level: u8) -> u32 {
        self.slots
            .iter()
            .find(|(slot_level, _)| *slot_level == level)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Configurable combatant standing in for the game's characters and
/// monsters.
pub struct TestCombatant {
    name: String,
    hp: i32,
    max_hp: i32,
    ac: i32,
    thac0: i32,
    strength: i32,
    dexterity: i32,
    attacks: usize,
    melee_die: String,
    ranged_die: Option<String>,
    caster: Option<CasterProfile>,
}

impl TestCombatant {
    pub fn fighter(name: &str, hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            ac: 5,
            thac0: 19,
            strength: 0,
            dexterity: 0,
            attacks: 1,
            melee_die: "1d8".to_string(),
            ranged_die: None,
            caster: None,
        }
    }

    pub fn goblin(name: &str, hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            ac: 6,
            thac0: 19,
            strength: 0,
            dexterity: 0,
            attacks: 1,
            melee_die: "1d6".to_string(),
            ranged_die: None,
            caster: None,
        }
    }

    pub fn magic_user(name: &str, hp: i32, level_one_slots: u32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            ac: 9,
            thac0: 19,
            strength: 0,
            dexterity: 0,
            attacks: 1,
            melee_die: "1d4".to_string(),
            ranged_die: None,
            caster: Some(CasterProfile {
                class: ClassId::MagicUser,
                slots: vec![(1, level_one_slots)],
            }),
        }
    }

    pub fn cleric(name: &str, hp: i32, level_one_slots: u32, level_two_slots: u32) -> Self {
        Self {
            name: name.to_string(),
            hp,
            max_hp: hp,
            ac: 7,
            thac0: 19,
            strength: 0,
            dexterity: 0,
            attacks: 1,
            melee_die: "1d6".to_string(),
            ranged_die: None,
            caster: Some(CasterProfile {
                class: ClassId::Cleric,
                slots: vec![(1, level_one_slots), (2, level_two_slots)],
            }),
        }
    }

    pub fn with_attacks(mut self, attacks: usize) -> Self {
        self.attacks = attacks;
        self
    }

    pub fn with_ranged(mut self, die: &str) -> Self {
        self.ranged_die = Some(die.to_string());
        self
    }

    pub fn with_strength(mut self, modifier: i32) -> Self {
        self.strength = modifier;
        self
    }

    pub fn with_dexterity(mut self, modifier: i32) -> Self {
        self.dexterity = modifier;
        self
    }

    pub fn with_current_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    pub fn current_hp(&self) -> i32 {
        self.hp
    }
}

impl Combatant for TestCombatant {
    fn name(&self) -> &str {
        &self.name
    }

    fn hit_points(&self) -> i32 {
        self.hp
    }

    fn max_hit_points(&self) -> i32 {
        self.max_hp
    }

    fn armor_class(&self) -> i32 {
        self.ac
    }

    fn thac0(&self) -> i32 {
        self.thac0
    }

    fn attacks_per_round(&self) -> usize {
        self.attacks
    }

    fn melee_damage_die(&self) -> &str {
        &self.melee_die
    }

    fn ranged_damage_die(&self) -> Option<&str> {
        self.ranged_die.as_deref()
    }

    fn strength_modifier(&self) -> i32 {
        self.strength
    }

    fn dexterity_modifier(&self) -> i32 {
        self.dexterity
    }

    fn apply_damage(&mut self, amount: u32) {
        self.hp = (self.hp - amount as i32).max(0);
    }

    fn heal(&mut self, amount: u32) {
        self.hp = (self.hp + amount as i32).min(self.max_hp);
    }

    fn as_caster(&self) -> Option<&dyn SpellCaster> {
        self.caster.as_ref().map(|profile| profile as &dyn SpellCaster)
    }
}

/// Upcasts a roster of fixtures into the trait objects the engine borrows.
pub fn as_dyn(members: Vec<&mut TestCombatant>) -> Vec<&mut dyn Combatant> {
    members
        .into_iter()
        .map(|member| member as &mut dyn Combatant)
        .collect()
}
