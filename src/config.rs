//! Battle-wide settings, passed explicitly into the engine and the AI.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    /// Opponent picks uniformly among affordable moves.
    Easy,
    #[default]
    Normal,
    /// Narrower score jitter on the basic scoring path.
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub difficulty: Difficulty,
    /// Narrate whether the opponent predicted the player's last move.
    pub show_ai_predictions: bool,
}

impl BattleConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_ai_predictions(mut self, show: bool) -> Self {
        self.show_ai_predictions = show;
        self
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}
