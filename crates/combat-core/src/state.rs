//! Encounter state and outcome enums.

use serde::{Deserialize, Serialize};

/// States of the encounter state machine. Each `step` call executes exactly
/// one transition out of the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterState {
    Init,
    RoundStart,
    TurnStart,
    AwaitIntent,
    ValidateIntent,
    ExecuteAction,
    ApplyEffects,
    CheckDeaths,
    CheckMorale,
    CheckVictory,
    Ended,
}

/// Final result of an encounter. Set exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterOutcome {
    PartyVictory,
    OppositionVictory,
    Faulted,
}
