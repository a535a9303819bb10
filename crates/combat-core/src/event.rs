//! The closed catalog of events emitted by the encounter engine.
//!
//! Events are immutable tagged records; consumers discriminate on the stable
//! `kind` tag (the variant name, also used by the serializer). The ordering
//! contract is strict: `ExecuteAction` emits only resolution events,
//! `ApplyEffects` emits only mutation events, and no state reorders or merges
//! events once produced.

use serde::{Deserialize, Serialize};

use crate::id::CombatantId;
use crate::intent::{ActionChoice, IntentKind};
use crate::modifier::ModifiedStat;
use crate::rejection::Rejection;
use crate::state::{EncounterOutcome, EncounterState};

/// Classification of an engine fault, serialized into `EncounterFaulted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    Dice,
    Provider,
    MissingCombatant,
    MissingSpell,
    StepBudget,
    Internal,
}

/// Every event the engine can emit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Event {
    // -- Lifecycle and control ------------------------------------------------
    EncounterStarted {
        encounter_id: String,
    },
    SurpriseRolled {
        party_roll: i32,
        opposition_roll: i32,
        party_surprised: bool,
        opposition_surprised: bool,
    },
    RoundStarted {
        round_no: u32,
    },
    InitiativeRolled {
        order: Vec<(CombatantId, i32)>,
    },
    TurnQueueBuilt {
        queue: Vec<CombatantId>,
    },
    TurnStarted {
        id: CombatantId,
    },
    TurnSkipped {
        id: CombatantId,
        reason: String,
    },
    NeedAction {
        id: CombatantId,
        available: Vec<ActionChoice>,
    },

    // -- Resolution (ExecuteAction only) --------------------------------------
    AttackRolled {
        attacker_id: CombatantId,
        defender_id: CombatantId,
        roll: i32,
        total: i32,
        needed: i32,
        hit: bool,
        critical: bool,
    },
    SpellCast {
        caster_id: CombatantId,
        spell_id: String,
        spell_name: String,
        target_ids: Vec<CombatantId>,
    },

    // -- Mutation (ApplyEffects only) -----------------------------------------
    DamageApplied {
        source_id: CombatantId,
        target_id: CombatantId,
        amount: u32,
        target_hp_after: i32,
    },
    HealingApplied {
        source_id: CombatantId,
        target_id: CombatantId,
        amount: u32,
        target_hp_after: i32,
    },
    SpellSlotConsumed {
        caster_id: CombatantId,
        level: u8,
        remaining: u32,
    },
    ConditionApplied {
        source_id: CombatantId,
        target_id: CombatantId,
        condition_id: String,
        duration: Option<u32>,
    },
    ModifierApplied {
        source_id: CombatantId,
        target_id: CombatantId,
        modifier_id: String,
        stat: ModifiedStat,
        value: i32,
        duration: u32,
    },

    // -- Upkeep ---------------------------------------------------------------
    ConditionExpired {
        id: CombatantId,
        condition_id: String,
        reason: String,
    },
    ModifierExpired {
        id: CombatantId,
        modifier_id: String,
    },

    // -- Death, morale, victory -----------------------------------------------
    EntityDied {
        entity_id: CombatantId,
    },
    MoraleCheckRolled {
        id: CombatantId,
        roll: i32,
        threshold: i32,
        failed: bool,
    },
    ForcedIntentQueued {
        id: CombatantId,
        intent_kind: IntentKind,
        reason: String,
    },
    ForcedIntentApplied {
        id: CombatantId,
        intent_kind: IntentKind,
    },
    VictoryDetermined {
        outcome: EncounterOutcome,
    },

    // -- Errors ---------------------------------------------------------------
    ActionRejected {
        id: CombatantId,
        reasons: Vec<Rejection>,
    },
    EncounterFaulted {
        state: EncounterState,
        actor_id: Option<CombatantId>,
        error_kind: FaultKind,
        message: String,
    },
}

impl Event {
    /// Stable discriminator, identical to the serialized `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::EncounterStarted { .. } => "EncounterStarted",
            Event::SurpriseRolled { .. } => "SurpriseRolled",
            Event::RoundStarted { .. } => "RoundStarted",
            Event::InitiativeRolled { .. } => "InitiativeRolled",
            Event::TurnQueueBuilt { .. } => "TurnQueueBuilt",
            Event::TurnStarted { .. } => "TurnStarted",
            Event::TurnSkipped { .. } => "TurnSkipped",
            Event::NeedAction { .. } => "NeedAction",
            Event::AttackRolled { .. } => "AttackRolled",
            Event::SpellCast { .. } => "SpellCast",
            Event::DamageApplied { .. } => "DamageApplied",
            Event::HealingApplied { .. } => "HealingApplied",
            Event::SpellSlotConsumed { .. } => "SpellSlotConsumed",
            Event::ConditionApplied { .. } => "ConditionApplied",
            Event::ModifierApplied { .. } => "ModifierApplied",
            Event::ConditionExpired { .. } => "ConditionExpired",
            Event::ModifierExpired { .. } => "ModifierExpired",
            Event::EntityDied { .. } => "EntityDied",
            Event::MoraleCheckRolled { .. } => "MoraleCheckRolled",
            Event::ForcedIntentQueued { .. } => "ForcedIntentQueued",
            Event::ForcedIntentApplied { .. } => "ForcedIntentApplied",
            Event::VictoryDetermined { .. } => "VictoryDetermined",
            Event::ActionRejected { .. } => "ActionRejected",
            Event::EncounterFaulted { .. } => "EncounterFaulted",
        }
    }

    /// True for events that record a state mutation (the `ApplyEffects`
    /// family). Useful for the post-`Ended` silence invariant.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Event::DamageApplied { .. }
                | Event::HealingApplied { .. }
                | Event::SpellSlotConsumed { .. }
                | Event::ConditionApplied { .. }
                | Event::ModifierApplied { .. }
        )
    }
}
