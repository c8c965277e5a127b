#[cfg(test)]
mod tests {
    use crate::battle::ai::{OpponentAI, TurnPhase};
    use crate::battle::engine::{PlayerAction, TurnEngine};
    use crate::battle::rng::TurnRng;
    use crate::battle::state::{BattleEvent, Side, TurnOutcome};
    use crate::boosts::MemoryBoostStore;
    use crate::catalog::builtin_catalog;
    use crate::config::{BattleConfig, Difficulty};
    use crate::environment::FixedClock;
    use rstest::rstest;

    const TURN_LIMIT: u32 = 300;

    /// Plays both sides with AIs until the battle ends. Returns the outcome
    /// and every event.
    fn auto_battle(player: &str, opponent: &str, difficulty: Difficulty, seed: u64) -> (TurnOutcome, Vec<BattleEvent>) {
        let catalog = builtin_catalog().unwrap();
        let config = BattleConfig::new(difficulty).with_ai_predictions(true);
        let mut engine = TurnEngine::from_catalog(
            catalog,
            player,
            opponent,
            &MemoryBoostStore::new(),
            config,
            TurnRng::seeded(seed),
            FixedClock(20),
        )
        .unwrap();

        let mut pilot = OpponentAI::new(difficulty);
        pilot.set_opponent_context(engine.opponent().moves.clone());
        let mut pilot_rng = TurnRng::seeded(seed.wrapping_add(1));

        for _ in 0..TURN_LIMIT {
            let choice = pilot.choose_move(engine.player(), &engine.opponent().stats, engine.environment(), &mut pilot_rng);
            let action = if choice.is_skip() {
                PlayerAction::SkipTurn
            } else {
                PlayerAction::use_move(choice.name)
            };
            // The pilot only picks affordable moves, so the step never rejects.
            let outcome = engine.step(action).unwrap();
            if let Some(reply) = engine.last_turn().iter().find(|r| r.side == Side::Opponent) {
                let opponent = &engine.opponent().stats;
                pilot.record_opponent_move(
                    &reply.move_name,
                    opponent.hp_ratio(),
                    opponent.energy_ratio(),
                    TurnPhase::from_turn(engine.turn()),
                );
            }
            if outcome != TurnOutcome::Ongoing {
                return (outcome, engine.events().events().to_vec());
            }
        }
        panic!("battle between {player} and {opponent} did not finish in {TURN_LIMIT} turns");
    }

    #[rstest]
    #[case("Jay", "Mika", Difficulty::Easy, 1)]
    #[case("bushy0225", "star5084", Difficulty::Normal, 7)]
    #[case("Belisarius", "car_tanle", Difficulty::Hard, 42)]
    fn seeded_battles_finish(
        #[case] player: &str,
        #[case] opponent: &str,
        #[case] difficulty: Difficulty,
        #[case] seed: u64,
    ) {
        let (outcome, events) = auto_battle(player, opponent, difficulty, seed);
        assert!(matches!(outcome, TurnOutcome::Victory | TurnOutcome::Defeat));
        assert_eq!(events.last(), Some(&BattleEvent::BattleEnded { outcome }));
    }

    #[test]
    fn same_seed_replays_identically() {
        let first = auto_battle("Mika ga Hoshii", "Mutthunter1", Difficulty::Normal, 99);
        let second = auto_battle("Mika ga Hoshii", "Mutthunter1", Difficulty::Normal, 99);
        assert_eq!(first, second);
    }
}
