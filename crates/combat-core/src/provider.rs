//! Tactical decision providers for non-interactive combatants.
//!
//! Providers see only the immutable [`CombatView`] and borrow the engine's
//! dice service, so every random draw stays on the single injected stream
//! and deterministic runs replay exactly.

use dice_roller::{DiceError, DiceService, DiceServiceExt};
use thiserror::Error;

use crate::id::CombatantId;
use crate::intent::Intent;
use crate::view::CombatView;

/// Failures surfaced by a tactical provider. The engine treats them as
/// encounter faults, not rule rejections.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("no eligible intent for {0}")]
    NoEligibleIntent(CombatantId),
}

/// Chooses an intent for one combatant's turn.
pub trait TacticalProvider {
    fn choose_intent(
        &self,
        view: &CombatView,
        actor_id: &CombatantId,
        dice: &mut dyn DiceService,
    ) -> Result<Intent, ProviderError>;
}

/// Default policy: a melee attack against a living opponent chosen uniformly
/// with the engine's dice service.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTargetProvider;

impl RandomTargetProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TacticalProvider for RandomTargetProvider {
    fn choose_intent(
        &self,
        view: &CombatView,
        actor_id: &CombatantId,
        dice: &mut dyn DiceService,
    ) -> Result<Intent, ProviderError> {
        let actor = view
            .combatant(actor_id)
            .ok_or_else(|| ProviderError::NoEligibleIntent(actor_id.clone()))?;
        let targets: Vec<CombatantId> = view
            .living(actor.side.opponent())
            .map(|c| c.id.clone())
            .collect();
        if targets.is_empty() {
            return Err(ProviderError::NoEligibleIntent(actor_id.clone()));
        }

        let target_id = dice.choice(&targets)?.clone();
        tracing::debug!(actor = %actor_id, target = %target_id, "provider chose melee target");
        Ok(Intent::MeleeAttack {
            actor_id: actor_id.clone(),
            target_id,
        })
    }
}
