//! Canonical combatant identifiers and the two-side model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical string id of a combatant, stable for the life of an encounter.
///
/// Player characters are `pc:<name>`; monsters are
/// `monster:<name>:<zero-based index in the opposing group>`. Events refer to
/// combatants exclusively through these ids.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(String);

impl CombatantId {
    pub fn pc(name: &str) -> Self {
        Self(format!("pc:{name}"))
    }

    pub fn monster(name: &str, index: usize) -> Self {
        Self(format!("monster:{name}:{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Player-facing name derived from the canonical id: `pc:Hero` renders as
    /// `Hero`, `monster:Goblin:0` as `Goblin #1`.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.0.strip_prefix("pc:") {
            return name.to_string();
        }
        if let Some(rest) = self.0.strip_prefix("monster:") {
            if let Some((name, index)) = rest.rsplit_once(':') {
                if let Ok(index) = index.parse::<usize>() {
                    return format!("{name} #{}", index + 1);
                }
            }
            return rest.to_string();
        }
        self.0.clone()
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of the encounter a combatant belongs to.
///
/// Side identity drives victory conditions and default targeting. The
/// variant order is load-bearing for initiative ties: `Party` sorts before
/// `Opposition`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Side {
    Party,
    Opposition,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Party => Side::Opposition,
            Side::Opposition => Side::Party,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_formats() {
        assert_eq!(CombatantId::pc("Mira").as_str(), "pc:Mira");
        assert_eq!(CombatantId::monster("Goblin", 2).as_str(), "monster:Goblin:2");
    }

    #[test]
    fn display_names_strip_prefixes() {
        assert_eq!(CombatantId::pc("Mira").display_name(), "Mira");
        assert_eq!(CombatantId::monster("Goblin", 0).display_name(), "Goblin #1");
    }

    #[test]
    fn party_sorts_before_opposition() {
        assert!(Side::Party < Side::Opposition);
        assert_eq!(Side::Party.opponent(), Side::Opposition);
        assert_eq!(Side::Opposition.opponent(), Side::Party);
    }

    #[test]
    fn id_serializes_transparently() {
        let id = CombatantId::pc("Mira");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!("pc:Mira")
        );
    }
}
