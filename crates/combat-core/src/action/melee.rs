//! Melee attack resolution.

use dice_roller::DiceService;

use super::{
    damage_amount, effective_armor_class, to_hit_needed, validate_actor, validate_enemy_target,
    ActionError, ActionOutcome, ActionResult, CombatAction,
};
use crate::context::EncounterContext;
use crate::effect::Effect;
use crate::event::Event;
use crate::id::CombatantId;
use crate::modifier::ModifiedStat;
use crate::rejection::Rejection;

/// Resolves a melee attack, deferring damage as effects.
#[derive(Clone, Debug)]
pub struct MeleeAttackAction {
    pub actor_id: CombatantId,
    pub target_id: CombatantId,
}

impl CombatAction for MeleeAttackAction {
    fn validate(&self, ctx: &EncounterContext<'_>) -> Vec<Rejection> {
        let mut rejections = Vec::new();
        if validate_actor(&self.actor_id, ctx, &mut rejections) {
            validate_enemy_target(&self.actor_id, &self.target_id, ctx, &mut rejections);
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

        let attack_modifier = attacker.entity.strength_modifier()
            + ctx.modifiers.total(&attacker.id, ModifiedStat::Attack);
        let damage_modifier = attacker.entity.strength_modifier()
            + ctx.modifiers.total(&attacker.id, ModifiedStat::Damage);
        let needed = to_hit_needed(
            attacker.entity.thac0(),
            effective_armor_class(defender, ctx),
        );

        let mut result = ActionResult::default();
        // Projected HP gates follow-up attacks once the defender would drop.
        let mut defender_hp = defender.entity.hit_points();

        for _ in 0..attacker.entity.attacks_per_round() {
            let roll = dice.d20()?;
            let total = roll + attack_modifier;
            let hit = defender_hp > 0 && (roll == 20 || (roll > 1 && total >= needed));
            let critical = roll == 20 && hit;

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
                let base = dice.roll(attacker.entity.melee_damage_die())? + damage_modifier;
                let amount = damage_amount(base, critical);
                result.effects.push(Effect::Damage {
                    source_id: self.actor_id.clone(),
                    target_id: self.target_id.clone(),
                    amount,
                });
                defender_hp -= amount as i32;
            }
        }

        Ok(ActionOutcome::Resolved(result))
    }
}
