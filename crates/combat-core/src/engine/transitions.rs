//! State handlers: one transition per `step` call.

use super::{CombatEngine, TransitionFault};
use crate::action::{build_action, ActionOutcome};
use crate::choices::available_choices;
use crate::condition::{condition_behavior, ActiveCondition};
use crate::effect::Effect;
use crate::event::Event;
use crate::id::Side;
use crate::intent::{Intent, IntentKind};
use crate::modifier::ActiveModifier;
use crate::rejection::{Rejection, RejectionCode};
use crate::state::{EncounterOutcome, EncounterState};

impl CombatEngine<'_> {
    pub(super) fn transition(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        tracing::trace!(state = ?self.state, "executing transition");
        match self.state {
            EncounterState::Init => self.handle_init(events),
            EncounterState::RoundStart => self.handle_round_start(events),
            EncounterState::TurnStart => self.handle_turn_start(events),
            EncounterState::AwaitIntent => self.handle_await_intent(events),
            EncounterState::ValidateIntent => self.handle_validate_intent(events),
            EncounterState::ExecuteAction => self.handle_execute_action(events),
            EncounterState::ApplyEffects => self.handle_apply_effects(events),
            EncounterState::CheckDeaths => self.handle_check_deaths(events),
            EncounterState::CheckMorale => self.handle_check_morale(events),
            EncounterState::CheckVictory => self.handle_check_victory(events),
            EncounterState::Ended => Ok(()),
        }
    }

    fn handle_init(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        events.push(Event::EncounterStarted {
            encounter_id: self.encounter_id.clone(),
        });

        let party_roll = self.dice.roll("1d6")?;
        let opposition_roll = self.dice.roll("1d6")?;
        self.party_surprised = party_roll <= 2;
        self.opposition_surprised = opposition_roll <= 2;
        events.push(Event::SurpriseRolled {
            party_roll,
            opposition_roll,
            party_surprised: self.party_surprised,
            opposition_surprised: self.opposition_surprised,
        });

        self.state = EncounterState::RoundStart;
        Ok(())
    }

    fn handle_round_start(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        self.ctx.round_no += 1;
        events.push(Event::RoundStarted {
            round_no: self.ctx.round_no,
        });

        if self.ctx.round_no > 1 {
            for (id, condition_id) in self.ctx.conditions.tick_round() {
                events.push(Event::ConditionExpired {
                    id,
                    condition_id,
                    reason: "duration".to_string(),
                });
            }
            for (id, modifier_id) in self.ctx.modifiers.tick_round() {
                events.push(Event::ModifierExpired { id, modifier_id });
            }
        }

        // Group initiative: one d6 per side per round.
        self.party_initiative = self.dice.roll("1d6")?;
        self.opposition_initiative = self.dice.roll("1d6")?;

        let surprise_round = self.ctx.round_no == 1;
        let mut order: Vec<(crate::id::CombatantId, Side, i32)> = self
            .ctx
            .combatants()
            .filter(|c| c.is_alive())
            .filter(|c| {
                !(surprise_round
                    && match c.side {
                        Side::Party => self.party_surprised,
                        Side::Opposition => self.opposition_surprised,
                    })
            })
            .map(|c| {
                let roll = match c.side {
                    Side::Party => self.party_initiative,
                    Side::Opposition => self.opposition_initiative,
                };
                (c.id.clone(), c.side, roll)
            })
            .collect();

        // Descending initiative; ties go to the party, then lexicographic id.
        order.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)).then(a.0.cmp(&b.0)));

        events.push(Event::InitiativeRolled {
            order: order.iter().map(|(id, _, roll)| (id.clone(), *roll)).collect(),
        });

        self.ctx.turn_queue = order.into_iter().map(|(id, _, _)| id).collect();
        events.push(Event::TurnQueueBuilt {
            queue: self.ctx.turn_queue.iter().cloned().collect(),
        });

        self.state = EncounterState::TurnStart;
        Ok(())
    }

    fn handle_turn_start(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let Some(current) = self.ctx.turn_queue.pop_front() else {
            self.ctx.current_id = None;
            self.state = EncounterState::RoundStart;
            return Ok(());
        };
        self.ctx.current_id = Some(current.clone());

        let alive = self
            .ctx
            .combatant(&current)
            .ok_or_else(|| TransitionFault::MissingCombatant(current.clone()))?
            .is_alive();
        if !alive {
            events.push(Event::TurnSkipped {
                id: current,
                reason: "dead".to_string(),
            });
            return Ok(());
        }
        if let Some(condition_id) = self.ctx.conditions.skip_reason(&current) {
            events.push(Event::TurnSkipped {
                id: current,
                reason: condition_id,
            });
            return Ok(());
        }

        events.push(Event::TurnStarted {
            id: current.clone(),
        });

        if let Some(forced) = self.ctx.take_forced(&current) {
            events.push(Event::ForcedIntentApplied {
                id: current,
                intent_kind: forced.intent.kind(),
            });
            self.pending_intent = Some(forced.intent);
            self.state = EncounterState::ValidateIntent;
            return Ok(());
        }

        self.enter_decision_point(events)
    }

    fn handle_await_intent(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        // A forced intent queued while the combatant was already waiting
        // overrides the menu (and any simultaneously supplied intent).
        if let Some(current) = self.ctx.current_id.clone() {
            if let Some(forced) = self.ctx.take_forced(&current) {
                events.push(Event::ForcedIntentApplied {
                    id: current,
                    intent_kind: forced.intent.kind(),
                });
                self.pending_intent = Some(forced.intent);
                self.state = EncounterState::ValidateIntent;
                return Ok(());
            }
        }

        if self.pending_intent.is_some() {
            self.state = EncounterState::ValidateIntent;
        }
        Ok(())
    }

    fn handle_validate_intent(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let intent = self
            .pending_intent
            .take()
            .ok_or(TransitionFault::NoPendingIntent(EncounterState::ValidateIntent))?;

        let action = build_action(&intent);
        let rejections = action.validate(&self.ctx);
        if rejections.is_empty() {
            self.pending_action = Some(action);
            self.state = EncounterState::ExecuteAction;
            return Ok(());
        }

        tracing::debug!(actor = %intent.actor_id(), count = rejections.len(), "intent rejected");
        events.push(Event::ActionRejected {
            id: intent.actor_id().clone(),
            reasons: rejections,
        });
        self.enter_decision_point(events)
    }

    fn handle_execute_action(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let action = self
            .pending_action
            .take()
            .ok_or(TransitionFault::NoPendingAction)?;

        match action.execute(&self.ctx, self.dice.as_mut())? {
            ActionOutcome::Resolved(result) => {
                events.extend(result.events);
                self.pending_effects = result.effects;
                self.state = EncounterState::ApplyEffects;
                Ok(())
            }
            ActionOutcome::Rejected(reasons) => {
                let current = self
                    .ctx
                    .current_id
                    .clone()
                    .ok_or(TransitionFault::NoCurrentCombatant)?;
                events.push(Event::ActionRejected {
                    id: current,
                    reasons,
                });
                self.enter_decision_point(events)
            }
        }
    }

    fn handle_apply_effects(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let effects = std::mem::take(&mut self.pending_effects);
        for effect in &effects {
            if let Some(rejection) = self.apply_effect(effect, events)? {
                // Failure stops the remaining effects of this action; what
                // already applied stays applied.
                let current = self
                    .ctx
                    .current_id
                    .clone()
                    .ok_or(TransitionFault::NoCurrentCombatant)?;
                events.push(Event::ActionRejected {
                    id: current,
                    reasons: vec![rejection],
                });
                return self.enter_decision_point(events);
            }
        }
        self.state = EncounterState::CheckDeaths;
        Ok(())
    }

    fn handle_check_deaths(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let newly_dead: Vec<_> = self
            .ctx
            .combatants()
            .filter(|c| !c.is_alive() && !self.ctx.announced_deaths.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        for id in newly_dead {
            self.ctx.announced_deaths.insert(id.clone());
            events.push(Event::EntityDied { entity_id: id });
        }
        self.state = EncounterState::CheckMorale;
        Ok(())
    }

    fn handle_check_morale(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        if self.morale.is_some() {
            let view = self.get_view();
            let checks = match self.morale.as_mut() {
                Some(policy) => policy.assess(&view, self.dice.as_mut())?,
                None => Vec::new(),
            };
            for check in checks {
                events.push(Event::MoraleCheckRolled {
                    id: check.id.clone(),
                    roll: check.roll,
                    threshold: check.threshold,
                    failed: check.failed,
                });
                if check.failed {
                    let reason = "morale broke".to_string();
                    self.ctx.queue_forced(
                        check.id.clone(),
                        Intent::Flee {
                            actor_id: check.id.clone(),
                        },
                        reason.clone(),
                    );
                    events.push(Event::ForcedIntentQueued {
                        id: check.id,
                        intent_kind: IntentKind::Flee,
                        reason,
                    });
                }
            }
        }
        self.state = EncounterState::CheckVictory;
        Ok(())
    }

    fn handle_check_victory(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        if !self.ctx.side_alive(Side::Party) {
            self.finish(EncounterOutcome::OppositionVictory, events);
        } else if !self.ctx.side_alive(Side::Opposition) {
            self.finish(EncounterOutcome::PartyVictory, events);
        } else if !self.ctx.turn_queue.is_empty() {
            self.state = EncounterState::TurnStart;
        } else {
            self.state = EncounterState::RoundStart;
        }
        Ok(())
    }

    // -- Helpers --------------------------------------------------------------

    /// Routes the current combatant to its decision source: the tactical
    /// provider for the opposition (or everyone in auto-resolve), a
    /// `NeedAction` menu for party members. Any previously forced intent is
    /// spent by the time this runs.
    fn enter_decision_point(&mut self, events: &mut Vec<Event>) -> Result<(), TransitionFault> {
        let current = self
            .ctx
            .current_id
            .clone()
            .ok_or(TransitionFault::NoCurrentCombatant)?;
        let side = self
            .ctx
            .combatant(&current)
            .ok_or_else(|| TransitionFault::MissingCombatant(current.clone()))?
            .side;

        if self.ctx.living(side.opponent()).is_empty() {
            self.state = EncounterState::CheckVictory;
            return Ok(());
        }

        if self.auto_resolve || side == Side::Opposition {
            let view = self.get_view();
            let intent = self
                .provider
                .choose_intent(&view, &current, self.dice.as_mut())?;
            self.pending_intent = Some(intent);
            self.state = EncounterState::ValidateIntent;
        } else {
            let available = available_choices(&self.ctx, &current);
            events.push(Event::NeedAction {
                id: current,
                available,
            });
            self.state = EncounterState::AwaitIntent;
        }
        Ok(())
    }

    /// Applies one effect. `Ok(Some(_))` is a rule failure that stops the
    /// remaining effects of the action; `Err` is an engine fault.
    fn apply_effect(
        &mut self,
        effect: &Effect,
        events: &mut Vec<Event>,
    ) -> Result<Option<Rejection>, TransitionFault> {
        match effect {
            Effect::Damage {
                source_id,
                target_id,
                amount,
            } => {
                let target = self
                    .ctx
                    .combatant_mut(target_id)
                    .ok_or_else(|| TransitionFault::MissingCombatant(target_id.clone()))?;
                target.entity.apply_damage(*amount);
                let target_hp_after = target.entity.hit_points();
                events.push(Event::DamageApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    amount: *amount,
                    target_hp_after,
                });
                for condition_id in self.ctx.conditions.break_on_damage(target_id) {
                    events.push(Event::ConditionExpired {
                        id: target_id.clone(),
                        condition_id,
                        reason: "damage".to_string(),
                    });
                }
                Ok(None)
            }
            Effect::ConsumeSlot { caster_id, level } => {
                match self.ctx.consume_slot(caster_id, *level) {
                    Some(remaining) => {
                        events.push(Event::SpellSlotConsumed {
                            caster_id: caster_id.clone(),
                            level: *level,
                            remaining,
                        });
                        Ok(None)
                    }
                    None => Ok(Some(Rejection::new(
                        RejectionCode::NoSpellSlot,
                        format!("no level {level} spell slots remaining"),
                    ))),
                }
            }
            Effect::ApplyCondition {
                source_id,
                target_id,
                condition_id,
                duration,
            } => {
                let behavior = condition_behavior(condition_id);
                self.ctx.conditions.add(
                    target_id.clone(),
                    ActiveCondition {
                        condition_id: condition_id.clone(),
                        source_id: source_id.clone(),
                        remaining_rounds: *duration,
                        skip_turn: behavior.skip_turn,
                        break_on_damage: behavior.break_on_damage,
                    },
                );
                events.push(Event::ConditionApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    condition_id: condition_id.clone(),
                    duration: *duration,
                });
                Ok(None)
            }
            Effect::Heal {
                source_id,
                target_id,
                amount,
            } => {
                let target = self
                    .ctx
                    .combatant_mut(target_id)
                    .ok_or_else(|| TransitionFault::MissingCombatant(target_id.clone()))?;
                // Death is irreversible within an encounter.
                if !target.entity.is_alive() {
                    return Ok(None);
                }
                target.entity.heal(*amount);
                let target_hp_after = target.entity.hit_points();
                events.push(Event::HealingApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    amount: *amount,
                    target_hp_after,
                });
                Ok(None)
            }
            Effect::ApplyModifier {
                source_id,
                target_id,
                modifier_id,
                stat,
                value,
                duration,
            } => {
                self.ctx.modifiers.add(
                    target_id.clone(),
                    ActiveModifier {
                        modifier_id: modifier_id.clone(),
                        source_id: source_id.clone(),
                        stat: *stat,
                        value: *value,
                        remaining_rounds: *duration,
                    },
                );
                events.push(Event::ModifierApplied {
                    source_id: source_id.clone(),
                    target_id: target_id.clone(),
                    modifier_id: modifier_id.clone(),
                    stat: *stat,
                    value: *value,
                    duration: *duration,
                });
                Ok(None)
            }
        }
    }

    fn finish(&mut self, outcome: EncounterOutcome, events: &mut Vec<Event>) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
        events.push(Event::VictoryDetermined { outcome });
        self.state = EncounterState::Ended;
        tracing::debug!(?outcome, "encounter ended");
    }
}
