//! Error types surfaced by the encounter engine.
//!
//! Two distinct families: [`EngineError`] covers caller contract violations
//! and the step-budget guard (the encounter state is left untouched or, for
//! the budget, deliberately faulted), while [`TransitionFault`] is the
//! internal catch-all that ends the encounter with outcome `Faulted`.

use thiserror::Error;

use crate::action::ActionError;
use crate::event::FaultKind;
use crate::id::CombatantId;
use crate::provider::ProviderError;
use crate::state::EncounterState;
use dice_roller::DiceError;

/// Caller-facing errors. Rule rejections are never errors; they travel as
/// `ActionRejected` events.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An intent was supplied while the engine was not awaiting one.
    #[error("an intent was supplied in state {state:?}; the engine only accepts intents while awaiting a decision")]
    UnexpectedIntent { state: EncounterState },

    /// The supplied intent names a combatant other than the pending one.
    #[error("intent actor {actual} does not match the pending combatant {expected}")]
    IntentActorMismatch {
        expected: CombatantId,
        actual: CombatantId,
    },

    /// An intent arrived while no combatant was pending a decision.
    #[error("an intent was supplied but no combatant is awaiting a decision")]
    NoPendingCombatant,

    /// The encounter is over; the requested operation is no longer valid.
    #[error("the encounter has already ended")]
    EncounterEnded,

    /// The referenced combatant is not enrolled in this encounter.
    #[error("unknown combatant id {0}")]
    UnknownCombatant(CombatantId),

    /// `step_until_decision` exhausted its budget; the encounter has been
    /// faulted.
    #[error("no decision point was reached within {max_steps} steps")]
    DecisionLoopExceeded { max_steps: usize },
}

/// Internal transition failures. Every variant ends the encounter via the
/// fault path with a matching [`FaultKind`].
#[derive(Debug, Error)]
pub(crate) enum TransitionFault {
    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("combatant {0} disappeared from the roster")]
    MissingCombatant(CombatantId),

    #[error("no current combatant in a state that requires one")]
    NoCurrentCombatant,

    #[error("reached {0:?} without a pending intent")]
    NoPendingIntent(EncounterState),

    #[error("reached ExecuteAction without a validated action")]
    NoPendingAction,

    #[error("no decision point was reached within {0} steps")]
    StepBudgetExhausted(usize),
}

impl TransitionFault {
    pub(crate) fn kind(&self) -> FaultKind {
        match self {
            TransitionFault::Dice(_) => FaultKind::Dice,
            TransitionFault::Provider(ProviderError::Dice(_)) => FaultKind::Dice,
            TransitionFault::Provider(_) => FaultKind::Provider,
            TransitionFault::Action(ActionError::Dice(_)) => FaultKind::Dice,
            TransitionFault::Action(ActionError::MissingCombatant(_)) => {
                FaultKind::MissingCombatant
            }
            TransitionFault::Action(ActionError::MissingSpell(_)) => FaultKind::MissingSpell,
            TransitionFault::MissingCombatant(_) => FaultKind::MissingCombatant,
            TransitionFault::NoCurrentCombatant
            | TransitionFault::NoPendingIntent(_)
            | TransitionFault::NoPendingAction => FaultKind::Internal,
            TransitionFault::StepBudgetExhausted(_) => FaultKind::StepBudget,
        }
    }
}
