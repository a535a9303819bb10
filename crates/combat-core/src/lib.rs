//! State-driven encounter engine for B/X-style tactical combat.
//!
//! The engine runs turn-based combat between a player-controlled party and
//! an opposing monster side, emitting a totally-ordered stream of typed
//! [`Event`]s for consumers. It is synchronous and single-threaded: each
//! [`CombatEngine::step`] call executes one state transition and returns,
//! suspending only when an external intent is required.
//!
//! Combatants are external collaborators reached through the narrow
//! [`Combatant`] trait; randomness flows exclusively through an injected
//! [`dice_roller::DiceService`], so encounters replay bit-for-bit under a
//! deterministic service.

pub mod action;
pub mod choices;
pub mod combatant;
pub mod condition;
pub mod context;
pub mod effect;
pub mod engine;
pub mod event;
pub mod formatter;
pub mod id;
pub mod intent;
pub mod modifier;
pub mod morale;
pub mod provider;
pub mod rejection;
pub mod serializer;
pub mod spellbook;
pub mod state;
pub mod view;

pub use action::{ActionOutcome, ActionResult, CombatAction};
pub use choices::available_choices;
pub use combatant::{ClassId, Combatant, SpellCaster};
pub use effect::Effect;
pub use engine::{CombatEngine, CombatEngineBuilder, EngineError, StepResult, DEFAULT_MAX_STEPS};
pub use event::{Event, FaultKind};
pub use formatter::EventFormatter;
pub use id::{CombatantId, Side};
pub use intent::{ActionChoice, Intent, IntentKind};
pub use modifier::ModifiedStat;
pub use morale::{GroupMoralePolicy, MoraleCheck, MoralePolicy};
pub use provider::{ProviderError, RandomTargetProvider, TacticalProvider};
pub use rejection::{Rejection, RejectionCode};
pub use serializer::EventSerializer;
pub use spellbook::{get_spell, SpellDefinition, TargetMode};
pub use state::{EncounterOutcome, EncounterState};
pub use view::{CombatView, CombatantView};
