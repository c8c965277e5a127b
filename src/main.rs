//! Auto-battle runner.
//!
//! Plays a full battle between two catalog characters with an AI piloting
//! the player side and prints the narration. Run with `RUST_LOG=debug` to
//! see the engine's internal rolls.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mikamon_battle::{
    builtin_catalog, crit_info, dodge_info, drop_rates, BattleConfig, BattleRng, BoostStore, Clock, Combatant,
    DayPhase, Difficulty, Inventory, JsonBoostStore, MemoryBoostStore, OpponentAI, PermanentBoosts, PlayerAction,
    Side, SystemClock, TurnEngine, TurnOutcome, TurnPhase, TurnRng, ITEMS, VICTORY_LUCK,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulate a Mikamon battle between two characters.
#[derive(Parser, Debug)]
#[command(name = "mikamon-battle")]
#[command(about = "Run an AI-versus-AI Mikamon battle", long_about = None)]
#[command(version)]
struct Cli {
    /// Character played by the (AI-piloted) player side
    #[arg(long, default_value = "Mika")]
    player: String,

    /// Opponent character; a random other character if omitted
    #[arg(long)]
    opponent: Option<String>,

    /// AI difficulty for both sides; overrides the config file
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for a reproducible battle
    #[arg(long)]
    seed: Option<u64>,

    /// RON battle config
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file of permanent boosts to apply
    #[arg(long)]
    boosts: Option<PathBuf>,

    /// Give up after this many turns
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// List the available characters and exit
    #[arg(long)]
    list: bool,

    /// List the item table and victory drop rates, then exit
    #[arg(long)]
    items: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = builtin_catalog().context("built-in character catalog is invalid")?;

    if cli.list {
        let phase = DayPhase::from_hour(SystemClock.current_hour());
        println!("It is {phase} (accuracy x{:.2}).", phase.accuracy_multiplier());
        for name in catalog.names() {
            let template = catalog.get(name)?;
            let stats = Combatant::from_template(template, &PermanentBoosts::default()).stats;
            let dodge = dodge_info(&stats, phase);
            let crit = crit_info(&stats, phase);
            let types: Vec<String> = template.types.iter().map(ToString::to_string).collect();
            println!(
                "{:<16} {:<18} dodge {:>4.1}%  crit {:>4.1}%",
                name,
                types.join("/"),
                dodge.chance,
                crit.base_chance
            );
        }
        return Ok(());
    }

    if cli.items {
        for item in ITEMS.iter() {
            println!(
                "{:<16} {:<8} {:<10} {:>5}  {}",
                item.name, item.category, item.rarity, item.cost, item.description
            );
        }
        let rates: Vec<String> = drop_rates(VICTORY_LUCK)
            .iter()
            .map(|(rarity, rate)| format!("{rarity} {rate:.1}%"))
            .collect();
        println!("Victory drops: {}", rates.join(", "));
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => BattleConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => BattleConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }

    let mut rng = match cli.seed {
        Some(seed) => TurnRng::seeded(seed),
        None => TurnRng::new_random(),
    };
    let mut pilot_rng = match cli.seed {
        Some(seed) => TurnRng::seeded(seed.wrapping_add(1)),
        None => TurnRng::new_random(),
    };

    let opponent_name = match &cli.opponent {
        Some(name) => name.clone(),
        None => catalog.random_opponent(&cli.player, &mut rng)?.name.clone(),
    };

    let store: Box<dyn BoostStore> = match &cli.boosts {
        Some(path) => Box::new(JsonBoostStore::open(path.clone())),
        None => Box::new(MemoryBoostStore::new()),
    };

    let difficulty = config.difficulty;
    let mut engine = TurnEngine::from_catalog(
        catalog,
        &cli.player,
        &opponent_name,
        store.as_ref(),
        config,
        rng,
        SystemClock,
    )?;
    println!(
        "{} vs {} | {} | {}",
        engine.player().name,
        engine.opponent().name,
        engine.environment().weather.kind(),
        engine.environment().day_phase
    );

    let mut pilot = OpponentAI::new(difficulty);
    pilot.set_opponent_context(engine.opponent().moves.clone());

    let outcome = run(&mut engine, &mut pilot, &mut pilot_rng, cli.max_turns)?;
    if outcome == TurnOutcome::Victory {
        let mut inventory = Inventory::starting();
        let reward = engine.claim_victory_reward(&mut inventory)?;
        if let Some(line) = engine.events().events().last().and_then(|event| event.format()) {
            println!("{}", line);
        }
        info!(item = reward.name, held = inventory.quantity(reward.name), "reward added to inventory");
    }
    let stats = engine.ai().prediction_stats();
    info!(
        ?outcome,
        turns = engine.turn(),
        ai_accuracy = stats.accuracy,
        ai_predictions = stats.predictions_made,
        "battle finished"
    );
    Ok(())
}

fn run(
    engine: &mut TurnEngine<TurnRng, SystemClock>,
    pilot: &mut OpponentAI,
    pilot_rng: &mut dyn BattleRng,
    max_turns: u32,
) -> Result<TurnOutcome> {
    let mut printed = engine.events().len();
    for _ in 0..max_turns {
        let choice = pilot.choose_move(engine.player(), &engine.opponent().stats, engine.environment(), pilot_rng);
        let action = if choice.is_skip() {
            PlayerAction::SkipTurn
        } else {
            PlayerAction::use_move(choice.name)
        };
        let outcome = engine.step(action)?;

        if let Some(reply) = engine.last_turn().iter().find(|r| r.side == Side::Opponent) {
            let opponent = &engine.opponent().stats;
            pilot.record_opponent_move(
                &reply.move_name,
                opponent.hp_ratio(),
                opponent.energy_ratio(),
                TurnPhase::from_turn(engine.turn()),
            );
        }

        for event in engine.events().since(printed) {
            if let Some(line) = event.format() {
                println!("{}", line);
            }
        }
        printed = engine.events().len();
        println!(
            "  {} {}/{} HP {}/{} MP | {} {}/{} HP {}/{} MP",
            engine.player().name,
            engine.player().stats.hp,
            engine.player().stats.max_hp,
            engine.player().stats.energy,
            engine.player().stats.max_energy,
            engine.opponent().name,
            engine.opponent().stats.hp,
            engine.opponent().stats.max_hp,
            engine.opponent().stats.energy,
            engine.opponent().stats.max_energy,
        );

        if outcome != TurnOutcome::Ongoing {
            return Ok(outcome);
        }
    }
    bail!("no winner after {} turns", max_turns)
}
