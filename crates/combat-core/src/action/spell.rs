//! Spell casting against the static catalog.
//!
//! Validation checks catalog membership, caster eligibility, slot level, and
//! target shape; execution emits the `SpellCast` resolution event and defers
//! every mutation, with `ConsumeSlot` always first so slot exhaustion stops
//! the rest of the cast.

use dice_roller::DiceService;

use super::{validate_actor, ActionError, ActionOutcome, ActionResult, CombatAction};
use crate::context::EncounterContext;
use crate::effect::Effect;
use crate::event::Event;
use crate::id::CombatantId;
use crate::rejection::{Rejection, RejectionCode};
use crate::spellbook::{get_spell, SpellDefinition, TargetMode};

/// Resolves a spell cast looked up from the catalog.
#[derive(Clone, Debug)]
pub struct CastSpellAction {
    pub actor_id: CombatantId,
    pub spell_id: String,
    pub slot_level: u8,
    pub target_ids: Vec<CombatantId>,
}

impl CastSpellAction {
    fn validate_targets(
        &self,
        spell: &SpellDefinition,
        ctx: &EncounterContext<'_>,
        out: &mut Vec<Rejection>,
    ) {
        match spell.target_mode {
            TargetMode::SingleEnemy => {
                if self.target_ids.len() != 1 {
                    out.push(Rejection::new(
                        RejectionCode::InvalidTarget,
                        format!("{} requires exactly one target", spell.name),
                    ));
                    return;
                }
                let target_id = &self.target_ids[0];
                match ctx.combatant(target_id) {
                    None => out.push(Rejection::new(
                        RejectionCode::InvalidTarget,
                        format!("{target_id} is not part of this encounter"),
                    )),
                    Some(target) => {
                        if !target.is_alive() {
                            out.push(Rejection::new(
                                RejectionCode::TargetDead,
                                format!("{target_id} is already dead"),
                            ));
                        }
                        if let Some(actor) = ctx.combatant(&self.actor_id) {
                            if actor.side == target.side {
                                out.push(Rejection::new(
                                    RejectionCode::TargetNotOpponent,
                                    format!("{target_id} is not an opponent"),
                                ));
                            }
                        }
                    }
                }
            }
            TargetMode::SingleAlly => {
                if self.target_ids.len() != 1 {
                    out.push(Rejection::new(
                        RejectionCode::InvalidTarget,
                        format!("{} requires exactly one ally target", spell.name),
                    ));
                    return;
                }
                let target_id = &self.target_ids[0];
                match ctx.combatant(target_id) {
                    None => out.push(Rejection::new(
                        RejectionCode::InvalidTarget,
                        format!("{target_id} is not part of this encounter"),
                    )),
                    Some(target) => {
                        if !target.is_alive() {
                            out.push(Rejection::new(
                                RejectionCode::TargetDead,
                                format!("{target_id} is already dead"),
                            ));
                        }
                        if let Some(actor) = ctx.combatant(&self.actor_id) {
                            if actor.side != target.side {
                                out.push(Rejection::new(
                                    RejectionCode::TargetNotAlly,
                                    format!("{target_id} is not an ally"),
                                ));
                            }
                        }
                    }
                }
            }
            TargetMode::Caster => {
                // Self-cast is the empty list; anything else is malformed.
                if !self.target_ids.is_empty() {
                    out.push(Rejection::new(
                        RejectionCode::InvalidTarget,
                        format!("{} targets only its caster", spell.name),
                    ));
                }
            }
            // Group targets resolve at execution time; the submitted list is
            // advisory.
            TargetMode::AllEnemies | TargetMode::AllAllies => {}
        }
    }

    fn resolved_targets(
        &self,
        spell: &SpellDefinition,
        ctx: &EncounterContext<'_>,
    ) -> Result<Vec<CombatantId>, ActionError> {
        let actor = ctx
            .combatant(&self.actor_id)
            .ok_or_else(|| ActionError::MissingCombatant(self.actor_id.clone()))?;
        let targets = match spell.target_mode {
            TargetMode::SingleEnemy | TargetMode::SingleAlly => self.target_ids.clone(),
            TargetMode::Caster => vec![self.actor_id.clone()],
            TargetMode::AllEnemies => ctx
                .living(actor.side.opponent())
                .into_iter()
                .map(|c| c.id.clone())
                .collect(),
            TargetMode::AllAllies => ctx
                .living(actor.side)
                .into_iter()
                .map(|c| c.id.clone())
                .collect(),
        };
        Ok(targets)
    }
}

impl CombatAction for CastSpellAction {
    fn validate(&self, ctx: &EncounterContext<'_>) -> Vec<Rejection> {
        let mut rejections = Vec::new();
        if !validate_actor(&self.actor_id, ctx, &mut rejections) {
            return rejections;
        }

        let Some(spell) = get_spell(&self.spell_id) else {
            rejections.push(Rejection::new(
                RejectionCode::UnknownSpell,
                format!("unknown spell: {}", self.spell_id),
            ));
            return rejections;
        };

        let caster = ctx
            .combatant(&self.actor_id)
            .and_then(|actor| actor.entity.as_caster());
        match caster {
            None => rejections.push(Rejection::new(
                RejectionCode::IneligibleCaster,
                format!("{} cannot cast spells", self.actor_id),
            )),
            Some(caster) => {
                if !spell.usable_by.contains(&caster.class()) {
                    rejections.push(Rejection::new(
                        RejectionCode::IneligibleCaster,
                        format!("{:?} cannot cast {}", caster.class(), spell.name),
                    ));
                }
                if self.slot_level != spell.level {
                    rejections.push(Rejection::new(
                        RejectionCode::SlotLevelMismatch,
                        format!(
                            "slot level {} does not match spell level {}",
                            self.slot_level, spell.level
                        ),
                    ));
                } else if caster.slots_at(self.slot_level) == 0 {
                    rejections.push(Rejection::new(
                        RejectionCode::NoSpellSlot,
                        format!(
                            "no level {} spell slots for this class and level",
                            self.slot_level
                        ),
                    ));
                }
            }
        }

        self.validate_targets(spell, ctx, &mut rejections);
        rejections
    }

    fn execute(
        &self,
        ctx: &EncounterContext<'_>,
        dice: &mut dyn DiceService,
    ) -> Result<ActionOutcome, ActionError> {
        let spell = get_spell(&self.spell_id)
            .ok_or_else(|| ActionError::MissingSpell(self.spell_id.clone()))?;
        let targets = self.resolved_targets(spell, ctx)?;

        let mut result = ActionResult::default();
        result.events.push(Event::SpellCast {
            caster_id: self.actor_id.clone(),
            spell_id: self.spell_id.clone(),
            spell_name: spell.name.to_string(),
            target_ids: targets.clone(),
        });

        // The slot is consumed before anything lands; if it fails to apply,
        // the effect-stop rule guarantees no target was touched.
        result.effects.push(Effect::ConsumeSlot {
            caster_id: self.actor_id.clone(),
            level: self.slot_level,
        });

        for target_id in &targets {
            if let Some(die) = spell.damage_die {
                let amount = dice.roll(die)?.max(1) as u32;
                result.effects.push(Effect::Damage {
                    source_id: self.actor_id.clone(),
                    target_id: target_id.clone(),
                    amount,
                });
            }
            if let Some(die) = spell.heal_die {
                let amount = dice.roll(die)?.max(0) as u32;
                result.effects.push(Effect::Heal {
                    source_id: self.actor_id.clone(),
                    target_id: target_id.clone(),
                    amount,
                });
            }
            if let Some(condition_id) = spell.condition_id {
                result.effects.push(Effect::ApplyCondition {
                    source_id: self.actor_id.clone(),
                    target_id: target_id.clone(),
                    condition_id: condition_id.to_string(),
                    duration: spell.condition_duration,
                });
            }
            for modifier in spell.modifiers {
                result.effects.push(Effect::ApplyModifier {
                    source_id: self.actor_id.clone(),
                    target_id: target_id.clone(),
                    modifier_id: modifier.modifier_id.to_string(),
                    stat: modifier.stat,
                    value: modifier.value,
                    duration: modifier.duration,
                });
            }
        }

        Ok(ActionOutcome::Resolved(result))
    }
}
