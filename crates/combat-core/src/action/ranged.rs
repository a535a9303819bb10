//! Ranged attack resolution.
//!
//! To-hit uses the dexterity modifier; damage takes no ability modifier.
//! Monster ranged attacks are deferred and rejected during validation.

use dice_roller::DiceService;

use super::{
    damage_amount, effective_armor_class, to_hit_needed, validate_actor, validate_enemy_target,
    ActionError, ActionOutcome, ActionResult, CombatAction,
};
use crate::context::EncounterContext;
use crate::effect::Effect;
use crate::event::Event;
use crate::id::{CombatantId, Side};
use crate::modifier::ModifiedStat;
use crate::rejection::{Rejection, RejectionCode};

/// Resolves a ranged attack with an equipped ranged weapon.
#[derive(Clone, Debug)]
pub struct RangedAttackAction {
    pub actor_id: CombatantId,
    pub target_id: CombatantId,
}

impl CombatAction for RangedAttackAction {
    fn validate(&self, ctx: &EncounterContext<'_>) -> Vec<Rejection> {
        let mut rejections = Vec::new();
        if !validate_actor(&self.actor_id, ctx, &mut rejections) {
            return rejections;
        }
        validate_enemy_target(&self.actor_id, &self.target_id, ctx, &mut rejections);

        if let Some(actor) = ctx.combatant(&self.actor_id) {
            if actor.side == Side::Opposition {
                rejections.push(Rejection::new(
                    RejectionCode::MonsterActionNotSupported,
                    "ranged attacks are not supported for monsters",
                ));
            } else if actor.entity.ranged_damage_die().is_none() {
                rejections.push(Rejection::new(
                    RejectionCode::NoRangedWeapon,
                    "no ranged weapon equipped",
                ));
            }
        }
        rejections
    }

    fn execute(
        &self,
        ctx: &EncounterContext<'_>,
        dice: &mut dyn DiceService,
    ) -> Result<ActionOutcome, ActionError> {
        let attacker = ctx
            .combatant(&self.actor_id)
            .ok_or_else(|| ActionError::MissingCombatant(self.actor_id.clone()))?;
        let defender = ctx
            .combatant(&self.target_id)
            .ok_or_else(|| ActionError::MissingCombatant(self.target_id.clone()))?;
        let ranged_die = attacker
            .entity
            .ranged_damage_die()
            .ok_or_else(|| ActionError::MissingCombatant(self.actor_id.clone()))?
            .to_string();

        let attack_modifier = attacker.entity.dexterity_modifier()
            + ctx.modifiers.total(&attacker.id, ModifiedStat::Attack);
        let needed = to_hit_needed(
            attacker.entity.thac0(),
            effective_armor_class(defender, ctx),
        );

        let roll = dice.d20()?;
        let total = roll + attack_modifier;
        let hit = roll == 20 || (roll > 1 && total >= needed);
        let critical = roll == 20;

        let mut result = ActionResult::default();
        result.events.push(Event::AttackRolled {
            attacker_id: self.actor_id.clone(),
            defender_id: self.target_id.clone(),
            roll,
            total,
            needed,
            hit,
            critical,
        });

        if hit {
            let base = dice.roll(&ranged_die)?;
            result.effects.push(Effect::Damage {
                source_id: self.actor_id.clone(),
                target_id: self.target_id.clone(),
                amount: damage_amount(base, critical),
            });
        }

        Ok(ActionOutcome::Resolved(result))
    }
}
