//! The turn state machine.
//!
//! A `TurnEngine` owns both combatants, the environment and the opponent AI
//! for one battle. Each `step` runs a whole round: the player's action, the
//! opponent's reply, end-of-turn regeneration and the weather tick. Item use
//! happens between steps and never advances the turn.

use crate::battle::ai::{OpponentAI, TurnPhase};
use crate::battle::calculators::{resolve_damage, DamageOutcome};
use crate::battle::rng::{BattleRng, TurnRng};
use crate::battle::state::{BattleEvent, EventBus, GameState, Side, TurnOutcome};
use crate::boosts::BoostStore;
use crate::catalog::Catalog;
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::environment::{Clock, DayPhase, Environment, SystemClock, WeatherKind};
use crate::errors::{ActionError, BattleEngineError, BattleResult, BattleStateError};
use crate::items::{find_item, random_drop, Inventory, Item, ItemOutcome, Luck, ITEMS};
use schema::MoveData;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Luck applied to the item drop awarded for a win.
pub const VICTORY_LUCK: Luck = Luck::Medium;

/// What the player asks the engine to do this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    UseMove { move_name: String },
    SkipTurn,
    Forfeit,
}

impl PlayerAction {
    pub fn use_move(name: impl Into<String>) -> Self {
        PlayerAction::UseMove { move_name: name.into() }
    }
}

/// One resolved action from the most recent step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub side: Side,
    pub move_name: String,
    pub damage: u32,
    pub effectiveness: f64,
    pub missed: bool,
    pub weather: WeatherKind,
    pub day_phase: DayPhase,
}

pub struct TurnEngine<R: BattleRng = TurnRng, C: Clock = SystemClock> {
    player: Combatant,
    opponent: Combatant,
    environment: Environment,
    ai: OpponentAI,
    config: BattleConfig,
    turn_count: u32,
    game_state: GameState,
    bus: EventBus,
    last_turn: Vec<TurnRecord>,
    reward_claimed: bool,
    rng: R,
    clock: C,
}

impl<R: BattleRng, C: Clock> TurnEngine<R, C> {
    /// Starts a battle, drawing the opening weather from `rng` and the day
    /// phase from `clock`.
    pub fn new(player: Combatant, opponent: Combatant, config: BattleConfig, mut rng: R, clock: C) -> Self {
        let environment = Environment::from_clock(&mut rng, &clock);
        Self::with_environment(player, opponent, environment, config, rng, clock)
    }

    pub fn with_environment(
        player: Combatant,
        opponent: Combatant,
        environment: Environment,
        config: BattleConfig,
        rng: R,
        clock: C,
    ) -> Self {
        let mut ai = OpponentAI::new(config.difficulty);
        ai.set_opponent_context(player.moves.clone());
        info!(
            player = %player.name,
            opponent = %opponent.name,
            difficulty = %config.difficulty,
            weather = %environment.weather.kind(),
            phase = %environment.day_phase,
            "battle started"
        );
        Self {
            player,
            opponent,
            environment,
            ai,
            config,
            turn_count: 0,
            game_state: GameState::WaitingForPlayerAction,
            bus: EventBus::new(),
            last_turn: Vec::new(),
            reward_claimed: false,
            rng,
            clock,
        }
    }

    /// Builds both combatants from catalog templates with their persisted
    /// permanent boosts applied.
    pub fn from_catalog(
        catalog: &Catalog,
        player_name: &str,
        opponent_name: &str,
        boosts: &dyn BoostStore,
        config: BattleConfig,
        rng: R,
        clock: C,
    ) -> BattleResult<Self> {
        let player = Combatant::from_template(catalog.get(player_name)?, &boosts.boosts_for(player_name));
        let opponent = Combatant::from_template(catalog.get(opponent_name)?, &boosts.boosts_for(opponent_name));
        Ok(Self::new(player, opponent, config, rng, clock))
    }

    /// Runs one full round for `action`.
    ///
    /// A rejected action (unknown move, not enough energy) returns an error
    /// and leaves the battle exactly as it was, apart from a narration line
    /// for the energy case.
    pub fn step(&mut self, action: PlayerAction) -> BattleResult<TurnOutcome> {
        if self.game_state.is_terminal() {
            return Err(BattleStateError::BattleOver.into());
        }

        let player_move = match action {
            PlayerAction::Forfeit => return Ok(self.forfeit()),
            PlayerAction::SkipTurn => MoveData::skip_turn(),
            PlayerAction::UseMove { move_name } => self
                .player
                .find_move(&move_name)
                .ok_or(ActionError::UnknownMove(move_name))?,
        };
        if !self.player.can_afford(&player_move) {
            self.bus.push(BattleEvent::ActionRejected {
                combatant: self.player.name.clone(),
                move_name: player_move.name.clone(),
            });
            return Err(ActionError::InsufficientEnergy {
                move_name: player_move.name,
                required: player_move.energy_cost,
                available: self.player.stats.energy,
            }
            .into());
        }

        self.environment.refresh_phase(&self.clock);
        self.last_turn.clear();
        self.bus.push(BattleEvent::TurnStarted {
            turn_number: self.turn_count + 1,
        });

        // Context for the AI is the player's state before acting.
        let hp_ratio = self.player.stats.hp_ratio();
        let energy_ratio = self.player.stats.energy_ratio();
        let phase = TurnPhase::from_turn(self.turn_count);

        self.game_state = GameState::ResolvingPlayerMove;
        let player_result = perform_move(
            &mut self.player,
            &mut self.opponent,
            &player_move,
            &self.environment,
            &mut self.rng,
            &mut self.bus,
        );
        self.record(Side::Player, &player_move, player_result);

        self.ai
            .record_opponent_move(&player_move.name, hp_ratio, energy_ratio, phase);
        self.reveal_prediction(&player_move.name);
        self.turn_count += 1;

        if self.opponent.is_fainted() {
            self.bus.push(BattleEvent::CombatantFainted {
                combatant: self.opponent.name.clone(),
            });
        } else {
            self.game_state = GameState::ResolvingOpponentMove;
            let ai_move = self
                .ai
                .choose_move(&self.opponent, &self.player.stats, &self.environment, &mut self.rng);
            let ai_result = perform_move(
                &mut self.opponent,
                &mut self.player,
                &ai_move,
                &self.environment,
                &mut self.rng,
                &mut self.bus,
            );
            self.record(Side::Opponent, &ai_move, ai_result);

            if self.player.is_fainted() {
                self.bus.push(BattleEvent::CombatantFainted {
                    combatant: self.player.name.clone(),
                });
            }
        }

        self.game_state = GameState::ApplyingEndOfTurn;
        self.apply_end_of_turn();

        let outcome = if self.opponent.is_fainted() {
            TurnOutcome::Victory
        } else if self.player.is_fainted() {
            TurnOutcome::Defeat
        } else {
            TurnOutcome::Ongoing
        };
        self.finish_turn(outcome);
        Ok(outcome)
    }

    /// Uses an inventory item on the player between turns.
    ///
    /// On success one unit is consumed. On failure nothing changes and the
    /// reason is narrated.
    pub fn use_item(
        &mut self,
        item_name: &str,
        inventory: &mut Inventory,
        store: &mut dyn BoostStore,
    ) -> BattleResult<ItemOutcome> {
        if self.game_state.is_terminal() {
            return Err(BattleStateError::BattleOver.into());
        }
        let item = find_item(item_name).ok_or_else(|| ActionError::UnknownItem(item_name.to_string()))?;
        if !inventory.has(item.name) {
            return Err(ActionError::ItemUnavailable(item.name.to_string()).into());
        }

        match item.apply(&mut self.player, store) {
            Ok(outcome) => {
                inventory.remove_one(item.name);
                self.bus.push(BattleEvent::ItemUsed {
                    combatant: self.player.name.clone(),
                    item: item.name.to_string(),
                    outcome: outcome.clone(),
                });
                info!(item = item.name, remaining = inventory.quantity(item.name), "item used");
                Ok(outcome)
            }
            Err(err) => {
                let message = match &err {
                    ActionError::ItemHadNoEffect { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                self.bus.push(BattleEvent::ItemFailed { message });
                Err(BattleEngineError::from(err))
            }
        }
    }

    /// Draws the item drop for a won battle and adds it to `inventory`.
    ///
    /// Only available once, after a Victory. If no item qualifies the
    /// reward is a Healing Potion.
    pub fn claim_victory_reward(&mut self, inventory: &mut Inventory) -> BattleResult<&'static Item> {
        if self.game_state != GameState::Victory || self.reward_claimed {
            return Err(BattleStateError::NoRewardAvailable.into());
        }
        let item = random_drop(&mut self.rng, VICTORY_LUCK, None).unwrap_or(&ITEMS[0]);
        inventory.add(item.name, 1);
        self.reward_claimed = true;
        self.bus.push(BattleEvent::ItemFound {
            item: item.name.to_string(),
            rarity: item.rarity,
        });
        info!(item = item.name, rarity = %item.rarity, "victory reward");
        Ok(item)
    }

    fn forfeit(&mut self) -> TurnOutcome {
        self.bus.push(BattleEvent::Forfeited {
            combatant: self.player.name.clone(),
        });
        self.finish_turn(TurnOutcome::Defeat);
        TurnOutcome::Defeat
    }

    fn reveal_prediction(&mut self, actual: &str) {
        if !self.config.show_ai_predictions {
            return;
        }
        if let Some(predicted) = self.ai.last_prediction() {
            self.bus.push(BattleEvent::PredictionRevealed {
                move_name: actual.to_string(),
                correct: predicted == actual,
            });
        }
    }

    fn apply_end_of_turn(&mut self) {
        for combatant in [&mut self.player, &mut self.opponent] {
            let amount = combatant.restore_energy(combatant.energy_regen);
            self.bus.push(BattleEvent::EnergyRegenerated {
                combatant: combatant.name.clone(),
                amount,
            });
        }

        let hour = self.clock.current_hour();
        if self.environment.weather.tick(&mut self.rng, hour) {
            let weather = self.environment.weather.kind();
            info!(%weather, duration = self.environment.weather.duration(), "weather changed");
            self.bus.push(BattleEvent::WeatherChanged { weather });
        }
    }

    fn finish_turn(&mut self, outcome: TurnOutcome) {
        self.game_state = match outcome {
            TurnOutcome::Ongoing => GameState::WaitingForPlayerAction,
            TurnOutcome::Victory => GameState::Victory,
            TurnOutcome::Defeat => GameState::Defeat,
        };
        if outcome != TurnOutcome::Ongoing {
            self.bus.push(BattleEvent::BattleEnded { outcome });
        }
        info!(
            turn = self.turn_count,
            ?outcome,
            player_hp = self.player.stats.hp,
            opponent_hp = self.opponent.stats.hp,
            "turn resolved"
        );
    }

    fn record(&mut self, side: Side, move_data: &MoveData, result: DamageOutcome) {
        self.last_turn.push(TurnRecord {
            side,
            move_name: move_data.name.clone(),
            damage: result.damage,
            effectiveness: result.effectiveness,
            missed: result.missed,
            weather: self.environment.weather.kind(),
            day_phase: self.environment.day_phase,
        });
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> &Combatant {
        &self.opponent
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn ai(&self) -> &OpponentAI {
        &self.ai
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.game_state
    }

    /// Completed turns so far.
    pub fn turn(&self) -> u32 {
        self.turn_count
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Actions resolved by the most recent step, in order.
    pub fn last_turn(&self) -> &[TurnRecord] {
        &self.last_turn
    }
}

/// Executes one side's move: skip regen, or cost, resolution and damage.
fn perform_move(
    actor: &mut Combatant,
    target: &mut Combatant,
    move_data: &MoveData,
    environment: &Environment,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) -> DamageOutcome {
    if move_data.is_skip() {
        let regen = actor.skip_turn_regen();
        actor.restore_energy(regen);
        bus.push(BattleEvent::TurnSkipped {
            combatant: actor.name.clone(),
            regen,
        });
        return DamageOutcome::no_op();
    }

    actor.spend_energy(move_data.energy_cost);
    let outcome = resolve_damage(move_data, &actor.stats, &target.stats, environment, rng, bus);
    if outcome.missed {
        bus.push(BattleEvent::MoveMissed {
            attacker: actor.name.clone(),
            move_name: move_data.name.clone(),
        });
        return outcome;
    }

    let dealt = target.take_damage(outcome.damage);
    debug!(attacker = %actor.name, move_name = %move_data.name, damage = outcome.damage, dealt, "move landed");
    bus.push(BattleEvent::MoveUsed {
        attacker: actor.name.clone(),
        move_name: move_data.name.clone(),
        damage: outcome.damage,
    });
    bus.push(BattleEvent::Effectiveness {
        multiplier: outcome.effectiveness,
    });
    outcome
}
