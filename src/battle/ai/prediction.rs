//! Pattern learning over the opponent's observed moves.
//!
//! Five independent signals are tracked per battle: situational
//! preferences, move sequences, responses to our own last move, timing by
//! battle phase and a repetition tendency. Predictions blend them with fixed
//! weights.

use schema::{MoveData, SKIP_TURN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::Display;
use tracing::trace;

pub const MIN_HISTORY_FOR_PREDICTION: usize = 3;
pub const REPETITION_WINDOW: usize = 5;
/// Scored predictions needed before historical accuracy scales confidence.
pub const ACCURACY_SCALING_THRESHOLD: u32 = 5;

const SITUATION_WEIGHT: f64 = 0.3;
const SEQUENCE_WEIGHT: f64 = 0.25;
const COUNTER_WEIGHT: f64 = 0.2;
const TIMING_WEIGHT: f64 = 0.15;
const REPETITION_WEIGHT: f64 = 0.1;
/// Extra pull towards "Skip Turn" when the opponent is low on energy.
const LOW_ENERGY_SKIP_PULL: f64 = 5.0;

const LOW_RATIO: f64 = 0.3;
const HIGH_RATIO: f64 = 0.7;

/// Coarse battle phase by turn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TurnPhase {
    Early,
    Mid,
    Late,
}

impl TurnPhase {
    pub fn from_turn(turn: u32) -> Self {
        if turn < 5 {
            TurnPhase::Early
        } else if turn < 10 {
            TurnPhase::Mid
        } else {
            TurnPhase::Late
        }
    }
}

/// One observed opponent move with the context it was chosen in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedMove {
    pub move_name: String,
    pub hp_ratio: f64,
    pub energy_ratio: f64,
    pub phase: TurnPhase,
    /// The move we used just before the opponent chose this one.
    pub own_previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub move_name: Option<String>,
    pub confidence: f64,
}

impl Prediction {
    pub fn none() -> Self {
        Self {
            move_name: None,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SituationalTable {
    low_hp: BTreeMap<String, u32>,
    high_hp: BTreeMap<String, u32>,
    low_energy: BTreeMap<String, u32>,
    high_energy: BTreeMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct PredictionModel {
    history: Vec<ObservedMove>,
    situational: SituationalTable,
    sequences: BTreeMap<String, Vec<String>>,
    counter_responses: BTreeMap<(String, String), u32>,
    timing: BTreeMap<(TurnPhase, String), u32>,
    repetition_tendency: f64,
    aggression: f64,
    correct_predictions: u32,
    scored_predictions: u32,
    last_prediction: Option<String>,
}

impl Default for PredictionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionModel {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            situational: SituationalTable::default(),
            sequences: BTreeMap::new(),
            counter_responses: BTreeMap::new(),
            timing: BTreeMap::new(),
            repetition_tendency: 0.0,
            aggression: 0.5,
            correct_predictions: 0,
            scored_predictions: 0,
            last_prediction: None,
        }
    }

    /// Records one opponent move. `move_data` is the move's definition from
    /// the opponent's roster, when known; it drives the aggression signal.
    pub fn record(&mut self, observed: ObservedMove, move_data: Option<&MoveData>) {
        let name = observed.move_name.clone();

        if observed.hp_ratio < LOW_RATIO {
            bump(&mut self.situational.low_hp, &name);
        } else if observed.hp_ratio > HIGH_RATIO {
            bump(&mut self.situational.high_hp, &name);
        }
        if observed.energy_ratio < LOW_RATIO {
            bump(&mut self.situational.low_energy, &name);
        } else if observed.energy_ratio > HIGH_RATIO {
            bump(&mut self.situational.high_energy, &name);
        }

        if let Some(previous) = self.history.last() {
            self.sequences
                .entry(previous.move_name.clone())
                .or_default()
                .push(name.clone());
        }

        if let Some(own) = &observed.own_previous {
            *self.counter_responses.entry((own.clone(), name.clone())).or_insert(0) += 1;
        }

        *self.timing.entry((observed.phase, name.clone())).or_insert(0) += 1;

        self.history.push(observed);

        if self.history.len() >= REPETITION_WINDOW {
            let recent = &self.history[self.history.len() - REPETITION_WINDOW..];
            let mut unique: Vec<&str> = recent.iter().map(|m| m.move_name.as_str()).collect();
            unique.sort_unstable();
            unique.dedup();
            self.repetition_tendency = 1.0 - unique.len() as f64 / REPETITION_WINDOW as f64;
        }

        if name == SKIP_TURN {
            self.aggression *= 0.9;
        } else if let Some(data) = move_data {
            let signal = f64::from(data.power) / 50.0 + f64::from(data.energy_cost) / 30.0;
            self.aggression = self.aggression * 0.8 + signal.min(1.0) * 0.2;
        }

        if let Some(predicted) = &self.last_prediction {
            self.scored_predictions += 1;
            if *predicted == name {
                self.correct_predictions += 1;
            }
        }
    }

    /// Predicts the opponent's next move. Needs at least three observed
    /// moves; otherwise returns no prediction with zero confidence.
    pub fn predict(
        &mut self,
        hp_ratio: f64,
        energy_ratio: f64,
        own_last_move: Option<&str>,
        phase: TurnPhase,
    ) -> Prediction {
        if self.history.len() < MIN_HISTORY_FOR_PREDICTION {
            self.last_prediction = None;
            return Prediction::none();
        }

        let mut scores: BTreeMap<String, f64> = BTreeMap::new();
        let mut total_weight = 0.0;

        let mut add_table = |table: &BTreeMap<String, u32>, scores: &mut BTreeMap<String, f64>| {
            for (name, &count) in table {
                *scores.entry(name.clone()).or_insert(0.0) += f64::from(count) * SITUATION_WEIGHT;
                total_weight += SITUATION_WEIGHT;
            }
        };

        if hp_ratio < LOW_RATIO {
            add_table(&self.situational.low_hp, &mut scores);
        } else if hp_ratio > HIGH_RATIO {
            add_table(&self.situational.high_hp, &mut scores);
        }
        if energy_ratio < LOW_RATIO {
            add_table(&self.situational.low_energy, &mut scores);
            *scores.entry(SKIP_TURN.to_string()).or_insert(0.0) += LOW_ENERGY_SKIP_PULL * SITUATION_WEIGHT;
        } else if energy_ratio > HIGH_RATIO {
            add_table(&self.situational.high_energy, &mut scores);
        }

        if let Some(last) = self.history.last() {
            if let Some(followers) = self.sequences.get(&last.move_name) {
                let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
                for follower in followers {
                    *counts.entry(follower.as_str()).or_insert(0) += 1;
                }
                for (name, count) in counts {
                    *scores.entry(name.to_string()).or_insert(0.0) += f64::from(count) * SEQUENCE_WEIGHT;
                    total_weight += SEQUENCE_WEIGHT;
                }
            }
        }

        if let Some(own) = own_last_move {
            for ((ours, response), &count) in &self.counter_responses {
                if ours == own {
                    *scores.entry(response.clone()).or_insert(0.0) += f64::from(count) * COUNTER_WEIGHT;
                    total_weight += COUNTER_WEIGHT;
                }
            }
        }

        for ((move_phase, name), &count) in &self.timing {
            if *move_phase == phase {
                *scores.entry(name.clone()).or_insert(0.0) += f64::from(count) * TIMING_WEIGHT;
                total_weight += TIMING_WEIGHT;
            }
        }

        if self.repetition_tendency > 0.6 && self.history.len() >= 2 {
            if let Some(last) = self.history.last() {
                *scores.entry(last.move_name.clone()).or_insert(0.0) += self.repetition_tendency * REPETITION_WEIGHT;
                total_weight += REPETITION_WEIGHT;
            }
        }

        // First maximum in name order wins ties.
        let best = scores
            .iter()
            .fold(None::<(&String, f64)>, |best, (name, &score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((name, score)),
            });
        let Some((predicted, top_score)) = best else {
            self.last_prediction = None;
            return Prediction::none();
        };

        let mut confidence = (top_score / total_weight.max(1.0)).min(1.0);
        if self.scored_predictions >= ACCURACY_SCALING_THRESHOLD {
            confidence *= 0.5 + 0.5 * self.accuracy();
        }

        let predicted = predicted.clone();
        trace!(predicted = %predicted, confidence, total_weight, "opponent move predicted");
        self.last_prediction = Some(predicted.clone());
        Prediction {
            move_name: Some(predicted),
            confidence,
        }
    }

    pub fn history(&self) -> &[ObservedMove] {
        &self.history
    }

    pub fn last_prediction(&self) -> Option<&str> {
        self.last_prediction.as_deref()
    }

    /// Fraction of scored predictions that were right; 0 before any.
    pub fn accuracy(&self) -> f64 {
        if self.scored_predictions == 0 {
            0.0
        } else {
            f64::from(self.correct_predictions) / f64::from(self.scored_predictions)
        }
    }

    pub fn scored_predictions(&self) -> u32 {
        self.scored_predictions
    }

    pub fn correct_predictions(&self) -> u32 {
        self.correct_predictions
    }

    pub fn aggression(&self) -> f64 {
        self.aggression
    }

    pub fn repetition_tendency(&self) -> f64 {
        self.repetition_tendency
    }
}

fn bump(table: &mut BTreeMap<String, u32>, name: &str) {
    *table.entry(name.to_string()).or_insert(0) += 1;
}
