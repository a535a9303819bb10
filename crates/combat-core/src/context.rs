//! Mutable, engine-owned encounter state.
//!
//! The context borrows every combatant for the life of the encounter and is
//! never handed out: external consumers read through immutable views, and
//! actions receive only shared references. Roster lookups are linear scans;
//! parties are small and the order doubles as the deterministic registration
//! order for death checks and target resolution.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::combatant::Combatant;
use crate::condition::ConditionTracker;
use crate::event::Event;
use crate::id::{CombatantId, Side};
use crate::intent::Intent;
use crate::modifier::ModifierTracker;

/// Uniform handle over one enrolled combatant.
pub struct CombatantRef<'a> {
    pub id: CombatantId,
    pub side: Side,
    pub entity: &'a mut dyn Combatant,
}

impl CombatantRef<'_> {
    pub fn is_alive(&self) -> bool {
        self.entity.is_alive()
    }
}

/// A queued override for one combatant's next turn.
#[derive(Clone, Debug)]
pub struct ForcedIntent {
    pub intent: Intent,
    pub reason: String,
}

/// Mutable state bag carried through the encounter's lifecycle.
pub struct EncounterContext<'a> {
    combatants: Vec<CombatantRef<'a>>,
    pub round_no: u32,
    pub turn_queue: VecDeque<CombatantId>,
    pub current_id: Option<CombatantId>,
    pub announced_deaths: BTreeSet<CombatantId>,
    pub conditions: ConditionTracker,
    pub modifiers: ModifierTracker,
    forced_intents: BTreeMap<CombatantId, ForcedIntent>,
    /// Remaining spell slots, keyed by caster and level. Seeded lazily from
    /// the caster's static slot table on first consumption.
    spell_slots: BTreeMap<(CombatantId, u8), u32>,
    /// Out-of-band events queued by the public API, drained into the next
    /// step's batch.
    outbound: Vec<Event>,
}

impl<'a> EncounterContext<'a> {
    /// Enrolls both sides under canonical ids.
    pub fn build(
        party: Vec<&'a mut dyn Combatant>,
        opposition: Vec<&'a mut dyn Combatant>,
    ) -> Self {
        let mut combatants = Vec::with_capacity(party.len() + opposition.len());
        for member in party {
            combatants.push(CombatantRef {
                id: CombatantId::pc(member.name()),
                side: Side::Party,
                entity: member,
            });
        }
        for (index, monster) in opposition.into_iter().enumerate() {
            combatants.push(CombatantRef {
                id: CombatantId::monster(monster.name(), index),
                side: Side::Opposition,
                entity: monster,
            });
        }

        Self {
            combatants,
            round_no: 0,
            turn_queue: VecDeque::new(),
            current_id: None,
            announced_deaths: BTreeSet::new(),
            conditions: ConditionTracker::default(),
            modifiers: ModifierTracker::default(),
            forced_intents: BTreeMap::new(),
            spell_slots: BTreeMap::new(),
            outbound: Vec::new(),
        }
    }

    pub fn combatants(&self) -> impl Iterator<Item = &CombatantRef<'a>> {
        self.combatants.iter()
    }

    pub fn combatant(&self, id: &CombatantId) -> Option<&CombatantRef<'a>> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    pub fn combatant_mut(&mut self, id: &CombatantId) -> Option<&mut CombatantRef<'a>> {
        self.combatants.iter_mut().find(|c| &c.id == id)
    }

    /// Living combatants of one side, in registration order.
    pub fn living(&self, side: Side) -> Vec<&CombatantRef<'a>> {
        self.combatants
            .iter()
            .filter(|c| c.side == side && c.is_alive())
            .collect()
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .any(|c| c.side == side && c.is_alive())
    }

    // -- Forced intents -------------------------------------------------------

    pub fn queue_forced(&mut self, id: CombatantId, intent: Intent, reason: String) {
        self.forced_intents.insert(id, ForcedIntent { intent, reason });
    }

    pub fn take_forced(&mut self, id: &CombatantId) -> Option<ForcedIntent> {
        self.forced_intents.remove(id)
    }

    pub fn has_forced(&self, id: &CombatantId) -> bool {
        self.forced_intents.contains_key(id)
    }

    // -- Spell slots ----------------------------------------------------------

    /// Remaining slots for `(caster, level)` without mutating the table.
    ///
    /// Falls back to the caster's static slot table when nothing has been
    /// consumed yet.
    pub fn slots_remaining(&self, id: &CombatantId, level: u8) -> u32 {
        if let Some(remaining) = self.spell_slots.get(&(id.clone(), level)) {
            return *remaining;
        }
        self.combatant(id)
            .and_then(|c| c.entity.as_caster())
            .map(|caster| caster.slots_at(level))
            .unwrap_or(0)
    }

    /// Consumes one slot, seeding the table lazily.
    ///
    /// Returns the remaining count after consumption, or `None` when no slot
    /// was left (the count never goes negative).
    pub fn consume_slot(&mut self, id: &CombatantId, level: u8) -> Option<u32> {
        let remaining = self.slots_remaining(id, level);
        if remaining == 0 {
            return None;
        }
        self.spell_slots.insert((id.clone(), level), remaining - 1);
        Some(remaining - 1)
    }

    // -- Outbound event buffer ------------------------------------------------

    pub fn push_outbound(&mut self, event: Event) {
        self.outbound.push(event);
    }

    pub fn drain_outbound(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbound)
    }
}
