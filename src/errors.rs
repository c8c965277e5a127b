use thiserror::Error;

/// Main error type for the Mikamon battle core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to character catalog lookup or loading
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to invalid player actions
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
}

/// Errors related to the character catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The specified character was not found in the catalog
    #[error("Character not found: {0}")]
    CharacterNotFound(String),
    /// Catalog data could not be parsed
    #[error("Malformed catalog data: {0}")]
    MalformedData(String),
    /// A character entry parsed but failed validation
    #[error("Invalid character '{name}': {reason}")]
    InvalidCharacter { name: String, reason: String },
    /// The catalog has no character other than the excluded one
    #[error("No opponent available besides {0}")]
    NoOpponentAvailable(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The battle already reached a terminal state
    #[error("The battle is already over")]
    BattleOver,
    /// Victory reward requested before a win, or claimed twice
    #[error("No victory reward to claim")]
    NoRewardAvailable,
}

/// Errors related to player actions. These are rejected before any state
/// changes; the caller is expected to prompt for another action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move name is not in the combatant's roster
    #[error("Unknown move: {0}")]
    UnknownMove(String),
    /// Not enough energy to pay the move's cost
    #[error("Not enough MP to use {move_name} (needs {required}, has {available})")]
    InsufficientEnergy {
        move_name: String,
        required: u32,
        available: u32,
    },
    /// Item name does not exist in the item table
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    /// Item exists but the inventory holds none of it
    #[error("No {0} left in the inventory")]
    ItemUnavailable(String),
    /// Item would not change anything (full HP, boost capped, ...)
    #[error("{item} had no effect: {reason}")]
    ItemHadNoEffect { item: String, reason: String },
}

/// Errors loading a battle configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Errors from the permanent boost store's backing file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Boost store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Boost store JSON invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors encoding or decoding an inventory snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Inventory snapshot codec failed: {0}")]
    Codec(#[from] postcard::Error),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn action_errors_wrap_into_engine_error() {
        let err: BattleEngineError = ActionError::UnknownMove("Flail".to_string()).into();
        assert_eq!(err.to_string(), "Action error: Unknown move: Flail");
    }

    #[test]
    fn insufficient_energy_message_names_the_move() {
        let err = ActionError::InsufficientEnergy {
            move_name: "Solar Beam".to_string(),
            required: 35,
            available: 20,
        };
        assert_eq!(err.to_string(), "Not enough MP to use Solar Beam (needs 35, has 20)");
    }
}
