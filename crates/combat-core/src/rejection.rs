//! Structured rejection codes for refused actions.
//!
//! Rejections are values, not errors: validators return every applicable
//! rejection so consumers can present them together, and the engine emits
//! them inside `ActionRejected` events. Consumers branch on [`RejectionCode`],
//! never on the human-readable text.

use serde::{Deserialize, Serialize};

/// Enumerated reason an action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCode {
    InvalidActor,
    ActorDead,
    ActorNotCurrent,
    TargetDead,
    TargetNotOpponent,
    TargetNotAlly,
    InvalidTarget,
    NoRangedWeapon,
    UnknownSpell,
    IneligibleCaster,
    SlotLevelMismatch,
    NoSpellSlot,
    MonsterActionNotSupported,
    UnsupportedIntent,
}

/// A single structured reason an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: RejectionCode,
    pub reason: String,
}

impl Rejection {
    pub fn new(code: RejectionCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }
}
