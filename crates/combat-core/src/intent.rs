//! Intents submitted by players or tactical providers, and the
//! presentation-neutral choices offered at decision points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::CombatantId;

/// A fully-specified proposed action for one combatant's turn.
///
/// `CastSpell::target_ids` is a genuine sequence: the empty list means the
/// spell targets the caster, never "no target specified". Spells that need
/// external targets reject an empty list during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Intent {
    MeleeAttack {
        actor_id: CombatantId,
        target_id: CombatantId,
    },
    RangedAttack {
        actor_id: CombatantId,
        target_id: CombatantId,
    },
    CastSpell {
        actor_id: CombatantId,
        spell_id: String,
        slot_level: u8,
        target_ids: Vec<CombatantId>,
    },
    Flee {
        actor_id: CombatantId,
    },
}

impl Intent {
    pub fn actor_id(&self) -> &CombatantId {
        match self {
            Intent::MeleeAttack { actor_id, .. }
            | Intent::RangedAttack { actor_id, .. }
            | Intent::CastSpell { actor_id, .. }
            | Intent::Flee { actor_id } => actor_id,
        }
    }

    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::MeleeAttack { .. } => IntentKind::MeleeAttack,
            Intent::RangedAttack { .. } => IntentKind::RangedAttack,
            Intent::CastSpell { .. } => IntentKind::CastSpell,
            Intent::Flee { .. } => IntentKind::Flee,
        }
    }
}

/// Discriminator-only view of an intent, used by forced-intent events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    MeleeAttack,
    RangedAttack,
    CastSpell,
    Flee,
}

impl IntentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntentKind::MeleeAttack => "MeleeAttack",
            IntentKind::RangedAttack => "RangedAttack",
            IntentKind::CastSpell => "CastSpell",
            IntentKind::Flee => "Flee",
        }
    }
}

/// A selectable action offered to whoever decides the current turn.
///
/// The engine produces structured `ui_key`/`ui_args` pairs; rendering is the
/// formatter's job. [`ActionChoice::label`] is a derived convenience for
/// simple consumers and is never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionChoice {
    pub ui_key: String,
    pub ui_args: BTreeMap<String, String>,
    pub intent: Intent,
}

impl ActionChoice {
    pub fn new(
        ui_key: &str,
        ui_args: impl IntoIterator<Item = (&'static str, String)>,
        intent: Intent,
    ) -> Self {
        Self {
            ui_key: ui_key.to_string(),
            ui_args: ui_args
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            intent,
        }
    }

    fn arg(&self, key: &str) -> Option<&str> {
        self.ui_args.get(key).map(String::as_str)
    }

    /// Human-readable label computed from `ui_key` and `ui_args`.
    pub fn label(&self) -> String {
        let target = || {
            self.arg("target_name")
                .or_else(|| self.arg("target_id"))
                .unwrap_or("???")
        };
        match self.ui_key.as_str() {
            "attack_target" => format!("Attack {}", target()),
            "ranged_attack_target" => format!("Ranged: {}", target()),
            "cast_spell" => {
                let spell = self
                    .arg("spell_name")
                    .or_else(|| self.arg("spell_id"))
                    .unwrap_or("???");
                match self.arg("target_name") {
                    Some(target) => format!("Cast {spell} on {target}"),
                    None => format!("Cast {spell}"),
                }
            }
            "flee" => "Flee".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_exposes_its_actor() {
        let intent = Intent::MeleeAttack {
            actor_id: CombatantId::pc("Mira"),
            target_id: CombatantId::monster("Goblin", 0),
        };
        assert_eq!(intent.actor_id(), &CombatantId::pc("Mira"));
        assert_eq!(intent.kind(), IntentKind::MeleeAttack);
    }

    #[test]
    fn self_cast_is_the_empty_target_list() {
        let intent = Intent::CastSpell {
            actor_id: CombatantId::pc("Zil"),
            spell_id: "shield".to_string(),
            slot_level: 1,
            target_ids: Vec::new(),
        };
        match intent {
            Intent::CastSpell { target_ids, .. } => assert!(target_ids.is_empty()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn intent_serializes_with_kind_tag() {
        let intent = Intent::Flee {
            actor_id: CombatantId::pc("Mira"),
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(value["kind"], "Flee");
        assert_eq!(value["actor_id"], "pc:Mira");
    }

    #[test]
    fn labels_render_from_structured_args() {
        let attack = ActionChoice::new(
            "attack_target",
            [
                ("target_id", "monster:Goblin:0".to_string()),
                ("target_name", "Goblin #1".to_string()),
            ],
            Intent::MeleeAttack {
                actor_id: CombatantId::pc("Mira"),
                target_id: CombatantId::monster("Goblin", 0),
            },
        );
        assert_eq!(attack.label(), "Attack Goblin #1");

        let flee = ActionChoice::new(
            "flee",
            [],
            Intent::Flee {
                actor_id: CombatantId::pc("Mira"),
            },
        );
        assert_eq!(flee.label(), "Flee");
    }

    #[test]
    fn spell_labels_mention_targets_when_present() {
        let cast = ActionChoice::new(
            "cast_spell",
            [
                ("spell_id", "magic_missile".to_string()),
                ("spell_name", "Magic Missile".to_string()),
                ("target_name", "Goblin #1".to_string()),
            ],
            Intent::CastSpell {
                actor_id: CombatantId::pc("Zil"),
                spell_id: "magic_missile".to_string(),
                slot_level: 1,
                target_ids: vec![CombatantId::monster("Goblin", 0)],
            },
        );
        assert_eq!(cast.label(), "Cast Magic Missile on Goblin #1");
    }
}
