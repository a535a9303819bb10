//! Immutable snapshots of encounter state for external consumers.
//!
//! Views are structural copies taken at call time. They are the only
//! supported read path out of the engine; mutating a view observably cannot
//! affect the encounter.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::id::{CombatantId, Side};

/// Frozen snapshot of one combatant's observable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub alive: bool,
    pub hp: i32,
    pub max_hp: i32,
    /// The side-level initiative roll of the current round (0 before round 1).
    pub initiative: i32,
}

/// Frozen snapshot of the whole encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CombatView {
    pub round_no: u32,
    pub current_id: Option<CombatantId>,
    pub combatants: Vec<CombatantView>,
    pub announced_deaths: BTreeSet<CombatantId>,
}

impl CombatView {
    pub fn combatant(&self, id: &CombatantId) -> Option<&CombatantView> {
        self.combatants.iter().find(|c| &c.id == id)
    }

    /// Living combatants of one side, in enrollment order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatantView> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CombatView {
        CombatView {
            round_no: 2,
            current_id: Some(CombatantId::pc("Mira")),
            combatants: vec![
                CombatantView {
                    id: CombatantId::pc("Mira"),
                    name: "Mira".to_string(),
                    side: Side::Party,
                    alive: true,
                    hp: 7,
                    max_hp: 10,
                    initiative: 5,
                },
                CombatantView {
                    id: CombatantId::monster("Goblin", 0),
                    name: "Goblin".to_string(),
                    side: Side::Opposition,
                    alive: false,
                    hp: 0,
                    max_hp: 4,
                    initiative: 2,
                },
            ],
            announced_deaths: BTreeSet::from([CombatantId::monster("Goblin", 0)]),
        }
    }

    #[test]
    fn lookup_and_living_filters() {
        let view = sample();
        assert!(view.combatant(&CombatantId::pc("Mira")).is_some());
        assert_eq!(view.living(Side::Party).count(), 1);
        assert_eq!(view.living(Side::Opposition).count(), 0);
    }

    #[test]
    fn views_are_detached_copies() {
        let view = sample();
        let mut copy = view.clone();
        copy.round_no = 99;
        copy.combatants[0].hp = -5;
        assert_eq!(view.round_no, 2);
        assert_eq!(view.combatants[0].hp, 7);
    }
}
