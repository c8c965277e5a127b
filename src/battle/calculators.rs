use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, EventBus};
use crate::battle::stats::{crit_chance, defense_factor, defensive_stat, dodge_chance, offensive_stat};
use crate::combatant::CombatantStats;
use crate::environment::Environment;
use schema::{ElementType, MoveData};
use tracing::debug;

pub const STAB_MULTIPLIER: f64 = 1.5;
pub const CRIT_MULTIPLIER: f64 = 1.5;
/// Damage variance is drawn from `[VARIANCE_LOW, 1.0)`.
pub const VARIANCE_LOW: f64 = 0.85;

/// Numeric result of one move resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u32,
    pub effectiveness: f64,
    pub missed: bool,
}

impl DamageOutcome {
    pub fn no_op() -> Self {
        Self {
            damage: 0,
            effectiveness: 1.0,
            missed: false,
        }
    }

    pub fn miss() -> Self {
        Self {
            damage: 0,
            effectiveness: 1.0,
            missed: true,
        }
    }
}

/// Resolves one move from `attacker` against `defender`.
///
/// Random draws happen in a fixed order: accuracy, dodge, crit, variance.
/// A skip-turn move draws nothing; a miss or dodge stops drawing early.
/// Narration (dodge, crit, weather, time bonus) is pushed to `bus`.
pub fn resolve_damage(
    move_data: &MoveData,
    attacker: &CombatantStats,
    defender: &CombatantStats,
    environment: &Environment,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) -> DamageOutcome {
    if move_data.is_skip() {
        return DamageOutcome::no_op();
    }

    let accuracy_roll = rng.roll_percent("accuracy");
    if accuracy_roll > u32::from(move_data.accuracy) {
        debug!(move_name = %move_data.name, accuracy_roll, "move missed");
        return DamageOutcome::miss();
    }

    let phase = environment.day_phase;
    let attacker = phase.apply_stat_bonus(attacker);
    let defender = phase.apply_stat_bonus(defender);

    let dodge = dodge_chance(defender.speed, phase);
    if rng.roll_chance("dodge") < dodge {
        debug!(move_name = %move_data.name, dodge, "attack dodged");
        bus.push(BattleEvent::AttackDodged {
            speed: defender.speed,
            chance: dodge,
        });
        return DamageOutcome::miss();
    }

    let attack_stat = offensive_stat(&attacker, move_data);
    let defense_stat = defensive_stat(&defender, move_data);

    let mut damage = f64::from(move_data.power) * (f64::from(attack_stat) / 100.0);
    damage *= 100.0 / (100.0 + f64::from(defense_stat) * defense_factor(move_data));

    if attacker.has_type(move_data.move_type) {
        damage *= STAB_MULTIPLIER;
    }

    let effectiveness = ElementType::effectiveness_against(move_data.move_type, &defender.types);
    damage *= effectiveness;

    let weather_multiplier = environment.weather_multiplier(move_data.move_type);
    if weather_multiplier > 1.0 {
        damage *= weather_multiplier;
        bus.push(BattleEvent::WeatherBoosted {
            percent: environment.weather.kind().boost_percent(),
        });
    }

    let phase_bonus = phase.type_bonus(&attacker.types);
    if phase_bonus > 1.0 {
        damage *= phase_bonus;
        bus.push(BattleEvent::PhaseBoosted { phase });
    }

    let crit = crit_chance(attacker.speed, move_data);
    if rng.roll_chance("critical hit") < crit {
        damage *= CRIT_MULTIPLIER;
        bus.push(BattleEvent::CriticalHit { chance: crit });
    }

    damage *= rng.uniform(VARIANCE_LOW, 1.0, "damage variance");

    let final_damage = (damage.floor() as u32).max(1);
    debug!(
        move_name = %move_data.name,
        attack_stat,
        defense_stat,
        effectiveness,
        weather_multiplier,
        phase_bonus,
        final_damage,
        "damage resolved"
    );

    DamageOutcome {
        damage: final_damage,
        effectiveness,
        missed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use crate::battle::tests::common::{calm_environment, move_with, TestCombatantBuilder};
    use crate::environment::{DayPhase, Weather, WeatherKind};
    use pretty_assertions::assert_eq;
    use schema::MoveEffect;

    fn grass_special() -> MoveData {
        move_with("Solar Beam", 90, ElementType::Grass, MoveEffect::Special)
    }

    fn grass_attacker() -> CombatantStats {
        TestCombatantBuilder::new("bushy0225")
            .with_types(vec![ElementType::Grass, ElementType::Oil])
            .with_offense(75, 95)
            .with_speed(0)
            .build()
            .stats
    }

    fn oil_defender() -> CombatantStats {
        TestCombatantBuilder::new("Belisarius")
            .with_types(vec![ElementType::Oil])
            .with_defense(80, 100)
            .with_speed(0)
            .build()
            .stats
    }

    #[test]
    fn skip_turn_is_a_no_op_without_draws() {
        let mut rng = ScriptedRng::new_for_test(vec![]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &MoveData::skip_turn(),
            &grass_attacker(),
            &oil_defender(),
            &calm_environment(),
            &mut rng,
            &mut bus,
        );
        assert_eq!(outcome, DamageOutcome::no_op());
        assert!(bus.is_empty());
    }

    #[test]
    fn failed_accuracy_roll_misses_before_dodge() {
        let mut shaky = grass_special();
        shaky.accuracy = 80;
        // Roll of 81 exceeds accuracy; no dodge draw follows.
        let mut rng = ScriptedRng::new_for_test(vec![0.80]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &shaky,
            &grass_attacker(),
            &oil_defender(),
            &calm_environment(),
            &mut rng,
            &mut bus,
        );
        assert_eq!(outcome, DamageOutcome::miss());
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn dodge_is_a_second_miss_gate() {
        let fast = TestCombatantBuilder::new("Belisarius")
            .with_types(vec![ElementType::Oil])
            .with_speed(120)
            .build()
            .stats;
        // Hit, then a dodge roll of 5.0 under the 20% chance. Morning lifts speed to 138.
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.05]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &grass_special(),
            &grass_attacker(),
            &fast,
            &calm_environment(),
            &mut rng,
            &mut bus,
        );
        assert!(outcome.missed);
        assert_eq!(outcome.damage, 0);
        assert_eq!(bus.events(), &[BattleEvent::AttackDodged { speed: 138, chance: 20.0 }]);
    }

    #[test]
    fn stab_super_effective_special_hit() {
        // Hit, no dodge, no crit, variance pinned to 1.0.
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99, 0.99, 1.0]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &grass_special(),
            &grass_attacker(),
            &oil_defender(),
            &calm_environment(),
            &mut rng,
            &mut bus,
        );
        // floor(90 * 0.95 * 100/170 * 1.5 * 1.4) = floor(105.61...)
        assert_eq!(
            outcome,
            DamageOutcome {
                damage: 105,
                effectiveness: 1.4,
                missed: false
            }
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn weather_phase_and_crit_stack() {
        let env = crate::environment::Environment::new(Weather::with_kind(WeatherKind::Rainy, 3), DayPhase::Afternoon);
        // Afternoon: special attack 95 -> 114, Grass attacker gets the 1.15 phase bonus.
        let attacker = grass_attacker().with_stat(schema::StatKind::Speed, 70);
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99, 0.0, 1.0]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &grass_special(),
            &attacker,
            &oil_defender(),
            &env,
            &mut rng,
            &mut bus,
        );
        // 90 * 1.14 * 100/170 * 1.5 * 1.4 * 1.35 * 1.15 * 1.5 = 295.1...
        assert_eq!(outcome.damage, 295);
        assert_eq!(
            bus.events(),
            &[
                BattleEvent::WeatherBoosted { percent: 35 },
                BattleEvent::PhaseBoosted {
                    phase: DayPhase::Afternoon
                },
                BattleEvent::CriticalHit { chance: 7.0 },
            ]
        );
    }

    #[test]
    fn landed_hits_deal_at_least_one() {
        let feeble = move_with("Poke", 1, ElementType::CrudeOil, MoveEffect::Physical);
        let weak = TestCombatantBuilder::new("weak").with_offense(1, 1).with_speed(0).build().stats;
        let wall = TestCombatantBuilder::new("wall")
            .with_types(vec![ElementType::Grass, ElementType::Car])
            .with_defense(999, 999)
            .with_speed(0)
            .build()
            .stats;
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99, 0.99, 0.0]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(&feeble, &weak, &wall, &calm_environment(), &mut rng, &mut bus);
        assert!(!outcome.missed);
        assert_eq!(outcome.damage, 1);
        assert!((outcome.effectiveness - 0.25).abs() < 1e-12);
    }

    #[test]
    fn temp_boosts_feed_the_matching_stat() {
        let boosted = grass_attacker().with_temp_boost(schema::StatKind::SpecialAttack, 3);
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99, 0.99, 1.0]);
        let mut bus = EventBus::new();
        let outcome = resolve_damage(
            &grass_special(),
            &boosted,
            &oil_defender(),
            &calm_environment(),
            &mut rng,
            &mut bus,
        );
        // floor(90 * 0.98 * 100/170 * 1.5 * 1.4)
        assert_eq!(outcome.damage, 108);
    }
}
