//! Reserved flee action.
//!
//! Pursuit and escape mechanics live outside this engine. Validation lets a
//! live, current combatant declare the intent; execution yields a placeholder
//! rejection so the encounter re-enters its decision point.

use dice_roller::DiceService;

use super::{validate_actor, ActionError, ActionOutcome, CombatAction};
use crate::context::EncounterContext;
use crate::id::CombatantId;
use crate::rejection::{Rejection, RejectionCode};

#[derive(Clone, Debug)]
pub struct FleeAction {
    pub actor_id: CombatantId,
}

impl CombatAction for FleeAction {
    fn validate(&self, ctx: &EncounterContext<'_>) -> Vec<Rejection> {
        let mut rejections = Vec::new();
        validate_actor(&self.actor_id, ctx, &mut rejections);
        rejections
    }

    fn execute(
        &self,
        _ctx: &EncounterContext<'_>,
        _dice: &mut dyn DiceService,
    ) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome::Rejected(vec![Rejection::new(
            RejectionCode::UnsupportedIntent,
            "fleeing is not resolved by the encounter engine",
        )]))
    }
}
