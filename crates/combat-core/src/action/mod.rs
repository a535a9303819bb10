//! Combat action interfaces and shared attack math.
//!
//! Actions are stateless: `validate` inspects the context and returns every
//! applicable rejection, `execute` computes resolution events plus deferred
//! effects, and the engine performs all mutation.

mod flee;
mod melee;
mod ranged;
mod spell;

use dice_roller::{DiceError, DiceService};
use thiserror::Error;

pub use flee::FleeAction;
pub use melee::MeleeAttackAction;
pub use ranged::RangedAttackAction;
pub use spell::CastSpellAction;

use crate::context::{CombatantRef, EncounterContext};
use crate::effect::Effect;
use crate::event::Event;
use crate::id::CombatantId;
use crate::intent::Intent;
use crate::modifier::ModifiedStat;
use crate::rejection::{Rejection, RejectionCode};

/// Pure action output: resolution events plus deferred mutation effects.
#[derive(Clone, Debug, Default)]
pub struct ActionResult {
    pub events: Vec<Event>,
    pub effects: Vec<Effect>,
}

/// What execution produced: a resolved action, or a rejection discovered at
/// execution time (the reserved `Flee` path).
#[derive(Clone, Debug)]
pub enum ActionOutcome {
    Resolved(ActionResult),
    Rejected(Vec<Rejection>),
}

/// Internal failures while executing an action. These are engine faults, not
/// rule rejections.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("combatant {0} is not enrolled in this encounter")]
    MissingCombatant(CombatantId),

    #[error("spell '{0}' vanished from the catalog between validation and execution")]
    MissingSpell(String),
}

/// Interface implemented by each concrete combat action.
pub trait CombatAction {
    /// Returns every applicable rejection; empty means the action is legal.
    fn validate(&self, ctx: &EncounterContext<'_>) -> Vec<Rejection>;

    /// Resolves the action against a read-only context.
    fn execute(
        &self,
        ctx: &EncounterContext<'_>,
        dice: &mut dyn DiceService,
    ) -> Result<ActionOutcome, ActionError>;
}

/// Builds the concrete action for an intent.
pub fn build_action(intent: &Intent) -> Box<dyn CombatAction> {
    match intent.clone() {
        Intent::MeleeAttack {
            actor_id,
            target_id,
        } => Box::new(MeleeAttackAction {
            actor_id,
            target_id,
        }),
        Intent::RangedAttack {
            actor_id,
            target_id,
        } => Box::new(RangedAttackAction {
            actor_id,
            target_id,
        }),
        Intent::CastSpell {
            actor_id,
            spell_id,
            slot_level,
            target_ids,
        } => Box::new(CastSpellAction {
            actor_id,
            spell_id,
            slot_level,
            target_ids,
        }),
        Intent::Flee { actor_id } => Box::new(FleeAction { actor_id }),
    }
}

// -- Shared validation --------------------------------------------------------

/// Checks that the actor exists, is the current combatant, and is alive.
///
/// Pushes every applicable rejection. Returns `false` when the actor is not
/// even enrolled, in which case nothing else can be evaluated.
pub(crate) fn validate_actor(
    actor_id: &CombatantId,
    ctx: &EncounterContext<'_>,
    out: &mut Vec<Rejection>,
) -> bool {
    let Some(actor) = ctx.combatant(actor_id) else {
        out.push(Rejection::new(
            RejectionCode::InvalidActor,
            format!("{actor_id} is not part of this encounter"),
        ));
        return false;
    };
    if ctx.current_id.as_ref() != Some(actor_id) {
        let expected = ctx
            .current_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "nobody".to_string());
        out.push(Rejection::new(
            RejectionCode::ActorNotCurrent,
            format!("not the current combatant (expected {expected})"),
        ));
    }
    if !actor.is_alive() {
        out.push(Rejection::new(
            RejectionCode::ActorDead,
            format!("{actor_id} is dead"),
        ));
    }
    true
}

/// Checks that the target exists, is alive, and stands on the opposite side.
pub(crate) fn validate_enemy_target(
    actor_id: &CombatantId,
    target_id: &CombatantId,
    ctx: &EncounterContext<'_>,
    out: &mut Vec<Rejection>,
) {
    let Some(target) = ctx.combatant(target_id) else {
        out.push(Rejection::new(
            RejectionCode::InvalidTarget,
            format!("{target_id} is not part of this encounter"),
        ));
        return;
    };
    if !target.is_alive() {
        out.push(Rejection::new(
            RejectionCode::TargetDead,
            format!("{target_id} is already dead"),
        ));
    }
    if let Some(actor) = ctx.combatant(actor_id) {
        if actor.side == target.side {
            out.push(Rejection::new(
                RejectionCode::TargetNotOpponent,
                format!("{target_id} is not an opponent"),
            ));
        }
    }
}

// -- Shared attack math -------------------------------------------------------

/// Roll needed to hit, derived from THAC0 and the defender's effective AC.
///
/// A natural 1 always misses, so the threshold never drops below 2.
pub(crate) fn to_hit_needed(thac0: i32, effective_ac: i32) -> i32 {
    (thac0 - effective_ac).max(2)
}

/// Defender AC with active armor-class modifiers folded in (descending AC:
/// negative modifiers make the defender harder to hit).
pub(crate) fn effective_armor_class(
    defender: &CombatantRef<'_>,
    ctx: &EncounterContext<'_>,
) -> i32 {
    defender.entity.armor_class() + ctx.modifiers.total(&defender.id, ModifiedStat::ArmorClass)
}

/// Final damage for a hit. Criticals deal 1.5x rounded down; every hit deals
/// at least 1.
pub(crate) fn damage_amount(base: i32, critical: bool) -> u32 {
    let amount = if critical { base * 3 / 2 } else { base };
    amount.max(1) as u32
}
