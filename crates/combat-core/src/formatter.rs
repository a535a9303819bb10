//! Human-readable log lines for events.
//!
//! One line per event, for logging and narrative layers. Consumers that need
//! to branch on event contents use the serializer, never these strings.

use crate::event::Event;
use crate::id::CombatantId;
use crate::state::EncounterOutcome;

/// Formats events into single log lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventFormatter;

impl EventFormatter {
    pub fn new() -> Self {
        Self
    }

    fn name(id: &CombatantId) -> String {
        id.display_name()
    }

    /// Returns a single-line description of one event.
    pub fn format(&self, event: &Event) -> String {
        match event {
            Event::EncounterStarted { encounter_id } => {
                format!("Encounter {encounter_id} begins.")
            }
            Event::SurpriseRolled {
                party_roll,
                opposition_roll,
                party_surprised,
                opposition_surprised,
            } => match (party_surprised, opposition_surprised) {
                (true, true) => format!(
                    "Both sides are surprised! (party roll: {party_roll}, opposition roll: {opposition_roll})"
                ),
                (true, false) => format!(
                    "The party is surprised! (party roll: {party_roll}, opposition roll: {opposition_roll})"
                ),
                (false, true) => format!(
                    "The opposition is surprised! (party roll: {party_roll}, opposition roll: {opposition_roll})"
                ),
                (false, false) => format!(
                    "No surprise. (party roll: {party_roll}, opposition roll: {opposition_roll})"
                ),
            },
            Event::RoundStarted { round_no } => format!("Round {round_no} begins."),
            Event::InitiativeRolled { order } => {
                let parts: Vec<String> = order
                    .iter()
                    .map(|(id, roll)| format!("{} ({roll})", Self::name(id)))
                    .collect();
                format!("Initiative: {}", parts.join(", "))
            }
            Event::TurnQueueBuilt { queue } => {
                let names: Vec<String> = queue.iter().map(Self::name).collect();
                format!("Turn order: {}", names.join(", "))
            }
            Event::TurnStarted { id } => format!("{}'s turn.", Self::name(id)),
            Event::TurnSkipped { id, reason } => {
                format!("{}'s turn is skipped ({reason}).", Self::name(id))
            }
            Event::NeedAction { id, available } => {
                let labels: Vec<String> = available.iter().map(|c| c.label()).collect();
                format!(
                    "Choose action for {}: {}",
                    Self::name(id),
                    labels.join(", ")
                )
            }
            Event::AttackRolled {
                attacker_id,
                defender_id,
                total,
                needed,
                hit,
                critical,
                ..
            } => {
                let attacker = Self::name(attacker_id);
                let defender = Self::name(defender_id);
                if *critical {
                    format!(
                        "{attacker} attacks {defender}: HIT (rolled {total} vs {needed}) CRITICAL HIT!"
                    )
                } else {
                    let result = if *hit { "HIT" } else { "MISS" };
                    format!("{attacker} attacks {defender}: {result} (rolled {total} vs {needed}).")
                }
            }
            Event::SpellCast {
                caster_id,
                spell_name,
                target_ids,
                ..
            } => {
                let caster = Self::name(caster_id);
                if target_ids.is_empty() {
                    format!("{caster} casts {spell_name}.")
                } else {
                    let targets: Vec<String> = target_ids.iter().map(Self::name).collect();
                    format!("{caster} casts {spell_name} on {}.", targets.join(", "))
                }
            }
            Event::DamageApplied {
                source_id,
                target_id,
                amount,
                target_hp_after,
            } => format!(
                "{} deals {amount} damage to {}. {} has {} HP remaining.",
                Self::name(source_id),
                Self::name(target_id),
                Self::name(target_id),
                (*target_hp_after).max(0)
            ),
            Event::HealingApplied {
                source_id,
                target_id,
                amount,
                target_hp_after,
            } => format!(
                "{} heals {} for {amount}. {} is at {} HP.",
                Self::name(source_id),
                Self::name(target_id),
                Self::name(target_id),
                target_hp_after
            ),
            Event::SpellSlotConsumed {
                caster_id,
                level,
                remaining,
            } => format!(
                "{} uses a level {level} spell slot ({remaining} remaining).",
                Self::name(caster_id)
            ),
            Event::ConditionApplied {
                source_id,
                target_id,
                condition_id,
                duration,
            } => {
                let duration_text = match duration {
                    Some(rounds) => format!("{rounds} rounds"),
                    None => "until removed".to_string(),
                };
                format!(
                    "{} applies {condition_id} to {} ({duration_text}).",
                    Self::name(source_id),
                    Self::name(target_id)
                )
            }
            Event::ModifierApplied {
                target_id,
                modifier_id,
                value,
                duration,
                ..
            } => format!(
                "{} gains {modifier_id} ({value:+}) for {duration} rounds.",
                Self::name(target_id)
            ),
            Event::ConditionExpired {
                id,
                condition_id,
                reason,
            } => format!(
                "{} is no longer {condition_id} ({reason}).",
                Self::name(id)
            ),
            Event::ModifierExpired { id, modifier_id } => {
                format!("{}'s {modifier_id} wears off.", Self::name(id))
            }
            Event::EntityDied { entity_id } => format!("{} falls!", Self::name(entity_id)),
            Event::MoraleCheckRolled {
                id,
                roll,
                threshold,
                failed,
            } => {
                let result = if *failed { "failed" } else { "passed" };
                format!(
                    "Morale check for {}: rolled {roll} vs {threshold}, {result}.",
                    Self::name(id)
                )
            }
            Event::ForcedIntentQueued { id, intent_kind, reason } => format!(
                "{} will be forced to {} ({reason}).",
                Self::name(id),
                intent_kind.as_str()
            ),
            Event::ForcedIntentApplied { id, intent_kind } => format!(
                "{}'s forced {} takes over this turn.",
                Self::name(id),
                intent_kind.as_str()
            ),
            Event::VictoryDetermined { outcome } => match outcome {
                EncounterOutcome::PartyVictory => "The party is victorious!".to_string(),
                EncounterOutcome::OppositionVictory => {
                    "The party has been defeated.".to_string()
                }
                EncounterOutcome::Faulted => "The encounter ended in a fault.".to_string(),
            },
            Event::ActionRejected { id, reasons } => {
                let text: Vec<&str> = reasons.iter().map(|r| r.reason.as_str()).collect();
                format!(
                    "Action rejected for {}: {}",
                    Self::name(id),
                    text.join("; ")
                )
            }
            Event::EncounterFaulted {
                state,
                error_kind,
                message,
                ..
            } => format!("FAULT in {state:?}: [{error_kind:?}] {message}"),
        }
    }

    /// Formats a batch, suppressing `NeedAction` lines whose menu was never
    /// interactable because a `ForcedIntentApplied` for the same combatant
    /// follows later in the batch.
    pub fn format_batch(&self, events: &[Event]) -> Vec<String> {
        events
            .iter()
            .enumerate()
            .filter(|(index, event)| match event {
                Event::NeedAction { id, .. } => !events[index + 1..].iter().any(|later| {
                    matches!(later, Event::ForcedIntentApplied { id: later_id, .. } if later_id == id)
                }),
                _ => true,
            })
            .map(|(_, event)| self.format(event))
            .collect()
    }
}
