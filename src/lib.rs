//! Mikamon Battle Core
//!
//! A turn-based creature battle simulator: sparse type matchups, weather and
//! real-time day phases, a stepwise damage pipeline, and an opponent AI that
//! learns the player's habits over the course of a battle. All randomness
//! and wall-clock time are injected so battles replay deterministically.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod boosts;
pub mod catalog;
pub mod combatant;
pub mod config;
pub mod environment;
pub mod errors;
pub mod items;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{BaseStats, CharacterTemplate, ElementType, MoveData, MoveEffect, StatKind, SKIP_TURN};

// --- From this crate's modules (`src/`) ---

// Battle engine, AI and narration.
pub use battle::ai::{OpponentAI, Prediction, PredictionStats, TurnPhase};
pub use battle::calculators::{resolve_damage, DamageOutcome};
pub use battle::engine::{PlayerAction, TurnEngine, TurnRecord, VICTORY_LUCK};
pub use battle::rng::{BattleRng, ScriptedRng, TurnRng};
pub use battle::stats::{crit_info, dodge_info, CritInfo, DodgeInfo};
pub use battle::state::{BattleEvent, EventBus, GameState, MessageTone, Side, TurnOutcome};

// Session inputs.
pub use boosts::{BoostKind, BoostStore, JsonBoostStore, MemoryBoostStore, PermanentBoosts};
pub use catalog::{builtin_catalog, Catalog};
pub use combatant::{Combatant, CombatantStats};
pub use config::{BattleConfig, Difficulty};
pub use environment::{Clock, DayPhase, Environment, FixedClock, SystemClock, Weather, WeatherKind};
pub use items::{
    drop_rates, find_item, random_drop, roll_rarity, Inventory, Item, ItemCategory, ItemOutcome, Luck, Rarity, ITEMS,
};

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, BattleEngineError, BattleResult, BattleStateError, CatalogError, CatalogResult,
    ConfigError, SnapshotError, StoreError,
};
