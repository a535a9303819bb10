//! The encounter state machine and its public facade.
//!
//! External controllers drive combat with [`CombatEngine::step`] (one
//! transition per call) or [`CombatEngine::step_until_decision`] (run until
//! an intent is needed or the encounter ends). The engine owns all mutable
//! state, suspends only in `AwaitIntent`, and emits a totally-ordered event
//! stream.

mod errors;
mod transitions;

use dice_roller::DiceService;

use crate::action::CombatAction;
use crate::combatant::Combatant;
use crate::context::EncounterContext;
use crate::effect::Effect;
use crate::event::Event;
use crate::id::{CombatantId, Side};
use crate::intent::Intent;
use crate::morale::MoralePolicy;
use crate::provider::{RandomTargetProvider, TacticalProvider};
use crate::state::{EncounterOutcome, EncounterState};
use crate::view::{CombatView, CombatantView};

pub use errors::EngineError;
pub(crate) use errors::TransitionFault;

/// Default step budget for [`CombatEngine::step_until_decision`].
pub const DEFAULT_MAX_STEPS: usize = 64;

/// Value returned by each [`CombatEngine::step`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    pub state: EncounterState,
    pub needs_intent: bool,
    pub pending_combatant_id: Option<CombatantId>,
    pub events: Vec<Event>,
}

/// State-machine combat engine over a borrowed party and opposition.
///
/// An engine runs exactly one encounter: after `Ended`, further `step` calls
/// return the terminal state with an empty event batch and mutate nothing.
pub struct CombatEngine<'a> {
    ctx: EncounterContext<'a>,
    dice: Box<dyn DiceService>,
    provider: Box<dyn TacticalProvider>,
    morale: Option<Box<dyn MoralePolicy>>,
    auto_resolve: bool,
    encounter_id: String,
    state: EncounterState,
    outcome: Option<EncounterOutcome>,
    pending_intent: Option<Intent>,
    pending_action: Option<Box<dyn CombatAction>>,
    pending_effects: Vec<Effect>,
    party_surprised: bool,
    opposition_surprised: bool,
    party_initiative: i32,
    opposition_initiative: i32,
}

impl<'a> CombatEngine<'a> {
    /// Convenience constructor with the default tactical provider and no
    /// morale policy.
    pub fn new(
        party: Vec<&'a mut dyn Combatant>,
        opposition: Vec<&'a mut dyn Combatant>,
        dice: impl DiceService + 'static,
    ) -> Self {
        Self::builder()
            .party(party)
            .opposition(opposition)
            .dice(dice)
            .build()
    }

    pub fn builder() -> CombatEngineBuilder<'a> {
        CombatEngineBuilder::new()
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn outcome(&self) -> Option<EncounterOutcome> {
        self.outcome
    }

    pub fn encounter_id(&self) -> &str {
        &self.encounter_id
    }

    /// Executes a single state transition.
    ///
    /// Supplying an intent is valid only while the engine awaits one for the
    /// matching combatant; anything else is a usage error that leaves the
    /// encounter untouched.
    pub fn step(&mut self, intent: Option<Intent>) -> Result<StepResult, EngineError> {
        if let Some(intent) = intent {
            self.accept_intent(intent)?;
        }
        if self.state == EncounterState::Ended {
            return Ok(StepResult {
                state: self.state,
                needs_intent: false,
                pending_combatant_id: self.ctx.current_id.clone(),
                events: Vec::new(),
            });
        }

        let mut events = self.ctx.drain_outbound();
        if let Err(fault) = self.transition(&mut events) {
            self.fault(&fault, &mut events);
        }
        Ok(self.step_result(events))
    }

    /// Advances until the engine needs an intent or the encounter ends,
    /// returning every intermediate result. The last element is always the
    /// decision-point or terminal result.
    ///
    /// Exhausting `max_steps` is an engine bug: the encounter is faulted and
    /// [`EngineError::DecisionLoopExceeded`] is returned.
    pub fn step_until_decision(
        &mut self,
        intent: Option<Intent>,
        max_steps: usize,
    ) -> Result<Vec<StepResult>, EngineError> {
        let mut results = Vec::new();
        let mut intent = intent;
        for _ in 0..max_steps {
            let result = self.step(intent.take())?;
            let done = result.needs_intent || result.state == EncounterState::Ended;
            results.push(result);
            if done {
                return Ok(results);
            }
        }

        tracing::error!(max_steps, "step budget exhausted without a decision point");
        let mut events = Vec::new();
        self.fault(&TransitionFault::StepBudgetExhausted(max_steps), &mut events);
        Err(EngineError::DecisionLoopExceeded { max_steps })
    }

    /// Structural snapshot of the encounter for read-only consumers.
    pub fn get_view(&self) -> CombatView {
        CombatView {
            round_no: self.ctx.round_no,
            current_id: self.ctx.current_id.clone(),
            combatants: self
                .ctx
                .combatants()
                .map(|c| CombatantView {
                    id: c.id.clone(),
                    name: c.entity.name().to_string(),
                    side: c.side,
                    alive: c.is_alive(),
                    hp: c.entity.hit_points(),
                    max_hp: c.entity.max_hit_points(),
                    initiative: match c.side {
                        Side::Party => self.party_initiative,
                        Side::Opposition => self.opposition_initiative,
                    },
                })
                .collect(),
            announced_deaths: self.ctx.announced_deaths.clone(),
        }
    }

    /// Queues a one-shot intent override for `combatant_id`, consumed at that
    /// combatant's next turn (or while it is already awaiting a decision).
    /// The matching `ForcedIntentQueued` event is emitted in the next step's
    /// batch.
    pub fn queue_forced_intent(
        &mut self,
        combatant_id: &CombatantId,
        intent: Intent,
        reason: &str,
    ) -> Result<(), EngineError> {
        if self.state == EncounterState::Ended {
            return Err(EngineError::EncounterEnded);
        }
        if self.ctx.combatant(combatant_id).is_none() {
            return Err(EngineError::UnknownCombatant(combatant_id.clone()));
        }

        let intent_kind = intent.kind();
        self.ctx
            .queue_forced(combatant_id.clone(), intent, reason.to_string());
        self.ctx.push_outbound(Event::ForcedIntentQueued {
            id: combatant_id.clone(),
            intent_kind,
            reason: reason.to_string(),
        });
        Ok(())
    }

    // -- Internals ------------------------------------------------------------

    fn accept_intent(&mut self, intent: Intent) -> Result<(), EngineError> {
        if self.state != EncounterState::AwaitIntent {
            return Err(EngineError::UnexpectedIntent { state: self.state });
        }
        let expected = self
            .ctx
            .current_id
            .clone()
            .ok_or(EngineError::NoPendingCombatant)?;
        if intent.actor_id() != &expected {
            return Err(EngineError::IntentActorMismatch {
                expected,
                actual: intent.actor_id().clone(),
            });
        }
        self.pending_intent = Some(intent);
        Ok(())
    }

    fn step_result(&self, events: Vec<Event>) -> StepResult {
        StepResult {
            state: self.state,
            needs_intent: self.state == EncounterState::AwaitIntent,
            pending_combatant_id: self.ctx.current_id.clone(),
            events,
        }
    }

    fn fault(&mut self, fault: &TransitionFault, events: &mut Vec<Event>) {
        tracing::error!(state = ?self.state, %fault, "encounter faulted");
        events.push(Event::EncounterFaulted {
            state: self.state,
            actor_id: self.ctx.current_id.clone(),
            error_kind: fault.kind(),
            message: fault.to_string(),
        });
        if self.outcome.is_none() {
            self.outcome = Some(EncounterOutcome::Faulted);
        }
        self.state = EncounterState::Ended;
    }
}

/// Builder for [`CombatEngine`]: inject the dice service, tactical provider,
/// morale policy, and resolution mode, then `build`.
pub struct CombatEngineBuilder<'a> {
    party: Vec<&'a mut dyn Combatant>,
    opposition: Vec<&'a mut dyn Combatant>,
    dice: Box<dyn DiceService>,
    provider: Box<dyn TacticalProvider>,
    morale: Option<Box<dyn MoralePolicy>>,
    auto_resolve: bool,
    encounter_id: Option<String>,
}

impl<'a> CombatEngineBuilder<'a> {
    fn new() -> Self {
        Self {
            party: Vec::new(),
            opposition: Vec::new(),
            dice: Box::new(dice_roller::RngDice::new()),
            provider: Box::new(RandomTargetProvider::new()),
            morale: None,
            auto_resolve: false,
            encounter_id: None,
        }
    }

    pub fn party(mut self, party: Vec<&'a mut dyn Combatant>) -> Self {
        self.party = party;
        self
    }

    pub fn opposition(mut self, opposition: Vec<&'a mut dyn Combatant>) -> Self {
        self.opposition = opposition;
        self
    }

    pub fn dice(mut self, dice: impl DiceService + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    pub fn provider(mut self, provider: impl TacticalProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    pub fn morale(mut self, policy: impl MoralePolicy + 'static) -> Self {
        self.morale = Some(Box::new(policy));
        self
    }

    /// Routes every combatant through the tactical provider; no `NeedAction`
    /// events are emitted.
    pub fn auto_resolve(mut self, auto_resolve: bool) -> Self {
        self.auto_resolve = auto_resolve;
        self
    }

    /// Overrides the generated encounter id (deterministic tests set this).
    pub fn encounter_id(mut self, encounter_id: impl Into<String>) -> Self {
        self.encounter_id = Some(encounter_id.into());
        self
    }

    pub fn build(self) -> CombatEngine<'a> {
        let encounter_id = self.encounter_id.unwrap_or_else(|| {
            let mut id = uuid::Uuid::new_v4().simple().to_string();
            id.truncate(12);
            id
        });

        CombatEngine {
            ctx: EncounterContext::build(self.party, self.opposition),
            dice: self.dice,
            provider: self.provider,
            morale: self.morale,
            auto_resolve: self.auto_resolve,
            encounter_id,
            state: EncounterState::Init,
            outcome: None,
            pending_intent: None,
            pending_action: None,
            pending_effects: Vec::new(),
            party_surprised: false,
            opposition_surprised: false,
            party_initiative: 0,
            opposition_initiative: 0,
        }
    }
}
