//! The adaptive opponent.
//!
//! `OpponentAI` learns from the moves its opponent makes, predicts the next
//! one and scores its own moves against that prediction.

pub mod prediction;
pub mod scoring;

pub use prediction::{ObservedMove, Prediction, PredictionModel, TurnPhase};
pub use scoring::{base_move_score, counter_strategies, skip_score, strategy_bonus, CounterStrategy};

use crate::battle::rng::BattleRng;
use crate::combatant::{Combatant, CombatantStats};
use crate::config::Difficulty;
use crate::environment::Environment;
use ordered_float::OrderedFloat;
use schema::MoveData;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::VecDeque;
use tracing::debug;

/// Confidence above which the AI plays against its prediction.
pub const COUNTER_CONFIDENCE: f64 = 0.4;
const OWN_HISTORY_LIMIT: usize = 10;

/// Snapshot of what the AI has learned so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub accuracy: f64,
    pub predictions_made: u32,
    pub opponent_aggression: f64,
    pub repetition_tendency: f64,
}

#[derive(Debug, Clone)]
pub struct OpponentAI {
    difficulty: Difficulty,
    model: PredictionModel,
    opponent_moves: Vec<MoveData>,
    own_history: VecDeque<String>,
    turn_count: u32,
}

impl OpponentAI {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            model: PredictionModel::new(),
            opponent_moves: Vec::new(),
            own_history: VecDeque::with_capacity(OWN_HISTORY_LIMIT),
            turn_count: 0,
        }
    }

    /// Gives the AI the opponent's roster so it can judge moves it sees.
    pub fn set_opponent_context(&mut self, opponent_moves: Vec<MoveData>) {
        self.opponent_moves = opponent_moves;
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Feeds one observed opponent move into the model.
    pub fn record_opponent_move(&mut self, move_name: &str, hp_ratio: f64, energy_ratio: f64, phase: TurnPhase) {
        let move_data = self.opponent_moves.iter().find(|m| m.name == move_name);
        let observed = ObservedMove {
            move_name: move_name.to_string(),
            hp_ratio,
            energy_ratio,
            phase,
            own_previous: self.own_history.back().cloned(),
        };
        self.model.record(observed, move_data);
    }

    /// Predicts the opponent's next move given its current ratios.
    pub fn predict_next_move(&mut self, hp_ratio: f64, energy_ratio: f64, phase: TurnPhase) -> Prediction {
        let own_last = self.own_history.back().cloned();
        self.model.predict(hp_ratio, energy_ratio, own_last.as_deref(), phase)
    }

    /// Picks this turn's move for `own` against `opponent`.
    ///
    /// Always returns something `own` can afford, falling back to
    /// "Skip Turn".
    pub fn choose_move(
        &mut self,
        own: &Combatant,
        opponent: &CombatantStats,
        environment: &Environment,
        rng: &mut dyn BattleRng,
    ) -> MoveData {
        self.turn_count += 1;
        let phase = TurnPhase::from_turn(self.turn_count);
        let prediction = self.predict_next_move(opponent.hp_ratio(), opponent.energy_ratio(), phase);

        let chosen = if own.affordable_moves().is_empty() {
            MoveData::skip_turn()
        } else {
            match &prediction.move_name {
                Some(predicted) if prediction.confidence > COUNTER_CONFIDENCE => {
                    self.counter_choice(own, opponent, environment, predicted, prediction.confidence, rng)
                }
                _ => self.basic_choice(own, opponent, environment, rng),
            }
        };

        debug!(
            ai = %own.name,
            chosen = %chosen.name,
            predicted = ?prediction.move_name,
            confidence = prediction.confidence,
            "ai chose move"
        );
        if self.own_history.len() == OWN_HISTORY_LIMIT {
            self.own_history.pop_front();
        }
        self.own_history.push_back(chosen.name.clone());
        chosen
    }

    fn basic_choice(
        &self,
        own: &Combatant,
        opponent: &CombatantStats,
        environment: &Environment,
        rng: &mut dyn BattleRng,
    ) -> MoveData {
        // Easy picks uniformly instead of scoring.
        if self.difficulty == Difficulty::Easy {
            let affordable = own.affordable_moves();
            return affordable[rng.pick_index(affordable.len(), "easy ai pick")].clone();
        }
        let jitter = if self.difficulty == Difficulty::Hard { 5.0 } else { 15.0 };
        let candidates = self.scored_candidates(own, opponent, environment, |_| 0.0);
        pick_best(candidates, jitter, rng)
    }

    fn counter_choice(
        &self,
        own: &Combatant,
        opponent: &CombatantStats,
        environment: &Environment,
        predicted: &str,
        confidence: f64,
        rng: &mut dyn BattleRng,
    ) -> MoveData {
        let strategies = counter_strategies(predicted, &self.opponent_moves, &own.moves);
        debug!(
            predicted,
            confidence,
            strategies = ?strategies.iter().map(|(s, w)| format!("{s}={w}")).collect::<Vec<_>>(),
            "countering predicted move"
        );
        let jitter = if confidence > 0.7 { 10.0 } else { 20.0 };
        let candidates = self.scored_candidates(own, opponent, environment, |m| {
            strategy_bonus(m, &strategies) * confidence
        });
        pick_best(candidates, jitter, rng)
    }

    /// Affordable roster moves in roster order, then "Skip Turn".
    fn scored_candidates(
        &self,
        own: &Combatant,
        opponent: &CombatantStats,
        environment: &Environment,
        extra: impl Fn(&MoveData) -> f64,
    ) -> Vec<(MoveData, f64)> {
        let mut candidates: Vec<(MoveData, f64)> = own
            .affordable_moves()
            .into_iter()
            .map(|m| (m.clone(), base_move_score(m, &opponent.types, environment) + extra(m)))
            .collect();
        candidates.push((
            MoveData::skip_turn(),
            skip_score(own.stats.energy_ratio(), own.stats.hp_ratio()),
        ));
        candidates
    }

    pub fn prediction_stats(&self) -> PredictionStats {
        PredictionStats {
            accuracy: self.model.accuracy(),
            predictions_made: self.model.scored_predictions(),
            opponent_aggression: self.model.aggression(),
            repetition_tendency: self.model.repetition_tendency(),
        }
    }

    /// The most recent prediction, if the last call produced one.
    pub fn last_prediction(&self) -> Option<&str> {
        self.model.last_prediction()
    }

    pub fn own_last_move(&self) -> Option<&str> {
        self.own_history.back().map(String::as_str)
    }

    pub fn own_history(&self) -> impl Iterator<Item = &str> {
        self.own_history.iter().map(String::as_str)
    }

    pub fn model(&self) -> &PredictionModel {
        &self.model
    }
}

/// Adds one jitter draw per candidate, in order, and returns the first
/// highest-scoring move.
fn pick_best(candidates: Vec<(MoveData, f64)>, jitter: f64, rng: &mut dyn BattleRng) -> MoveData {
    candidates
        .into_iter()
        .map(|(m, score)| {
            let noisy = score + rng.uniform(-jitter, jitter, "ai jitter");
            (m, noisy)
        })
        .min_by_key(|(_, score)| Reverse(OrderedFloat(*score)))
        .map(|(m, _)| m)
        .unwrap_or_else(MoveData::skip_turn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use crate::battle::tests::common::{calm_environment, move_with, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use schema::{ElementType, MoveEffect, SKIP_TURN};

    fn roster() -> Vec<MoveData> {
        let mut vine = move_with("Vine Bonk", 40, ElementType::Grass, MoveEffect::Physical);
        vine.energy_cost = 10;
        let mut beam = move_with("Solar Beam", 90, ElementType::Light, MoveEffect::Special);
        beam.energy_cost = 60;
        vec![vine, beam]
    }

    fn opponent_stats() -> CombatantStats {
        TestCombatantBuilder::new("Target").with_types(vec![ElementType::Human]).build().stats
    }

    #[test]
    fn nothing_affordable_forces_skip_without_draws() {
        let mut own = TestCombatantBuilder::new("Broke").with_moves(roster()).build();
        own.stats.energy = 5;
        let mut ai = OpponentAI::new(Difficulty::Normal);
        let mut rng = ScriptedRng::new_for_test(vec![]);

        let chosen = ai.choose_move(&own, &opponent_stats(), &calm_environment(), &mut rng);
        assert_eq!(chosen.name, SKIP_TURN);
        assert_eq!(ai.own_last_move(), Some(SKIP_TURN));
    }

    #[test]
    fn easy_picks_uniformly_among_affordable() {
        let own = TestCombatantBuilder::new("Mika").with_moves(roster()).build();
        let mut ai = OpponentAI::new(Difficulty::Easy);
        let mut rng = ScriptedRng::new_for_test(vec![0.99, 0.0]);

        let env = calm_environment();
        assert_eq!(ai.choose_move(&own, &opponent_stats(), &env, &mut rng).name, "Solar Beam");
        assert_eq!(ai.choose_move(&own, &opponent_stats(), &env, &mut rng).name, "Vine Bonk");
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn normal_prefers_highest_score_with_neutral_jitter() {
        let own = TestCombatantBuilder::new("Mika").with_moves(roster()).build();
        let mut ai = OpponentAI::new(Difficulty::Normal);
        // 0.5 maps every jitter draw to zero: two moves plus skip.
        let mut rng = ScriptedRng::new_for_test(vec![0.5; 3]);

        let chosen = ai.choose_move(&own, &opponent_stats(), &calm_environment(), &mut rng);
        // Vine Bonk 40 + 8 = 48; Solar Beam 90 + 3 = 93; skip 0.
        assert_eq!(chosen.name, "Solar Beam");
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn jitter_can_flip_close_scores() {
        let mut a = move_with("Alpha", 50, ElementType::Human, MoveEffect::Physical);
        a.energy_cost = 10;
        let mut b = move_with("Beta", 55, ElementType::Human, MoveEffect::Physical);
        b.energy_cost = 11;
        let own = TestCombatantBuilder::new("Mika").with_moves(vec![a, b]).build();
        let env = calm_environment();

        // Alpha 50 + 10 = 60, Beta 55 + 10 = 65. Normal jitter is +-15.
        let mut ai = OpponentAI::new(Difficulty::Normal);
        let mut rng = ScriptedRng::new_for_test(vec![1.0, 0.0, 0.5]);
        assert_eq!(ai.choose_move(&own, &opponent_stats(), &env, &mut rng).name, "Alpha");

        // Hard jitter is +-5, not enough to close the gap.
        let mut ai = OpponentAI::new(Difficulty::Hard);
        let mut rng = ScriptedRng::new_for_test(vec![1.0, 0.0, 0.5]);
        assert_eq!(ai.choose_move(&own, &opponent_stats(), &env, &mut rng).name, "Beta");
    }

    #[test]
    fn low_energy_makes_skip_attractive() {
        let mut tiny = move_with("Poke", 10, ElementType::Human, MoveEffect::Physical);
        tiny.energy_cost = 5;
        let mut own = TestCombatantBuilder::new("Tired").with_moves(vec![tiny]).with_energy(100).build();
        own.stats.energy = 20;
        let mut ai = OpponentAI::new(Difficulty::Hard);
        let mut rng = ScriptedRng::new_for_test(vec![0.5; 2]);

        // Poke 10 + 4 = 14 against skip 40.
        let chosen = ai.choose_move(&own, &opponent_stats(), &calm_environment(), &mut rng);
        assert_eq!(chosen.name, SKIP_TURN);
    }

    #[test]
    fn confident_prediction_switches_to_counter_play() {
        let mut heavy = move_with("Heavy", 40, ElementType::Human, MoveEffect::Physical);
        heavy.energy_cost = 40;
        let mut quick = move_with("Quick", 36, ElementType::Human, MoveEffect::Stun);
        quick.energy_cost = 10;
        let own = TestCombatantBuilder::new("Mika").with_moves(vec![heavy, quick]).build();

        let mut threat = move_with("Big Hit", 60, ElementType::Human, MoveEffect::Physical);
        threat.energy_cost = 30;
        let mut ai = OpponentAI::new(Difficulty::Hard);
        ai.set_opponent_context(vec![threat]);
        for _ in 0..3 {
            ai.record_opponent_move("Big Hit", 0.9, 0.9, TurnPhase::Early);
        }

        let mut rng = ScriptedRng::new_for_test(vec![0.5; 3]);
        let target = TestCombatantBuilder::new("Target").build().stats;
        let chosen = ai.choose_move(&own, &target, &calm_environment(), &mut rng);
        // Confidence is 1.0; Quick fits the disable strategy (+25) and
        // high damage is not in play. Heavy 40 + 2 = 42, Quick 36 + 7.2 + 25 = 68.2.
        assert_eq!(chosen.name, "Quick");
        assert_eq!(ai.last_prediction(), Some("Big Hit"));
    }

    #[test]
    fn easy_still_counters_a_confident_prediction() {
        let mut heavy = move_with("Heavy", 40, ElementType::Human, MoveEffect::Physical);
        heavy.energy_cost = 40;
        let mut quick = move_with("Quick", 36, ElementType::Human, MoveEffect::Stun);
        quick.energy_cost = 10;
        let own = TestCombatantBuilder::new("Mika").with_moves(vec![heavy, quick]).build();

        let mut threat = move_with("Big Hit", 60, ElementType::Human, MoveEffect::Physical);
        threat.energy_cost = 30;
        let mut ai = OpponentAI::new(Difficulty::Easy);
        ai.set_opponent_context(vec![threat]);
        for _ in 0..3 {
            ai.record_opponent_move("Big Hit", 0.9, 0.9, TurnPhase::Early);
        }

        // A uniform pick would take Heavy on a 0.0 draw. The counter path
        // spends one jitter draw per candidate and lands on Quick.
        let mut rng = ScriptedRng::new_for_test(vec![0.5; 3]);
        let target = TestCombatantBuilder::new("Target").build().stats;
        let chosen = ai.choose_move(&own, &target, &calm_environment(), &mut rng);
        assert_eq!(chosen.name, "Quick");
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn own_history_is_capped() {
        let own = TestCombatantBuilder::new("Mika").with_moves(roster()).build();
        let mut ai = OpponentAI::new(Difficulty::Easy);
        let mut rng = ScriptedRng::new_for_test(vec![0.0; 12]);
        for _ in 0..12 {
            ai.choose_move(&own, &opponent_stats(), &calm_environment(), &mut rng);
        }
        assert_eq!(ai.own_history().count(), OWN_HISTORY_LIMIT);
    }

    #[test]
    fn stats_track_learning() {
        let mut ai = OpponentAI::new(Difficulty::Normal);
        ai.set_opponent_context(roster());
        let stats = ai.prediction_stats();
        assert_eq!(stats.predictions_made, 0);
        assert_eq!(stats.opponent_aggression, 0.5);

        for _ in 0..3 {
            ai.record_opponent_move("Vine Bonk", 0.5, 0.5, TurnPhase::Early);
        }
        let prediction = ai.predict_next_move(0.5, 0.5, TurnPhase::Early);
        assert_eq!(prediction.move_name.as_deref(), Some("Vine Bonk"));
        ai.record_opponent_move("Vine Bonk", 0.5, 0.5, TurnPhase::Early);

        let stats = ai.prediction_stats();
        assert_eq!(stats.predictions_made, 1);
        assert_eq!(stats.accuracy, 1.0);
        assert!(stats.opponent_aggression > 0.5);
    }
}
