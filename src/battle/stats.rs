use crate::combatant::CombatantStats;
use crate::environment::DayPhase;
use schema::{MoveData, StatKind};

/// Dodge chance caps at this many percent before the night multiplier.
pub const DODGE_CAP: f64 = 20.0;
/// Base crit chance caps at this many percent.
pub const CRIT_CAP: f64 = 10.0;
/// Flat bonus for critical/devastating moves, and the cap with the bonus.
pub const CRIT_MOVE_BONUS: f64 = 15.0;
pub const CRIT_BONUS_CAP: f64 = 25.0;

/// Percent chance that a defender with `speed` dodges, after the phase's
/// dodge multiplier.
pub fn dodge_chance(speed: u32, phase: DayPhase) -> f64 {
    DODGE_CAP.min(f64::from(speed) / 5.0) * phase.dodge_multiplier()
}

/// Percent chance that an attacker with `speed` lands a critical hit with
/// `move_data`.
pub fn crit_chance(speed: u32, move_data: &MoveData) -> f64 {
    let base = CRIT_CAP.min(f64::from(speed) / 10.0);
    if move_data.effect.boosts_crit() {
        (base + CRIT_MOVE_BONUS).min(CRIT_BONUS_CAP)
    } else {
        base
    }
}

/// Offensive stat for the move's class, with temporary delta folded in.
pub fn offensive_stat(stats: &CombatantStats, move_data: &MoveData) -> u32 {
    let kind = if move_data.effect.is_physical_like() {
        StatKind::Attack
    } else {
        StatKind::SpecialAttack
    };
    stats.boosted_stat(kind)
}

/// Defensive stat for the move's class, with temporary delta folded in.
pub fn defensive_stat(stats: &CombatantStats, move_data: &MoveData) -> u32 {
    let kind = if move_data.effect.is_physical_like() {
        StatKind::Defense
    } else {
        StatKind::SpecialDefense
    };
    stats.boosted_stat(kind)
}

/// Physical defense is worth 0.5 per point, special defense 0.7.
pub fn defense_factor(move_data: &MoveData) -> f64 {
    if move_data.effect.is_physical_like() {
        0.5
    } else {
        0.7
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DodgeInfo {
    pub speed: u32,
    pub chance: f64,
    pub is_night: bool,
}

/// Display summary of a combatant's dodge chance in `phase`.
pub fn dodge_info(stats: &CombatantStats, phase: DayPhase) -> DodgeInfo {
    let speed = phase.apply_stat_bonus(stats).speed;
    DodgeInfo {
        speed,
        chance: dodge_chance(speed, phase),
        is_night: phase == DayPhase::Night,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CritInfo {
    pub speed: u32,
    pub base_chance: f64,
    pub with_move_bonus: f64,
}

pub fn crit_info(stats: &CombatantStats, phase: DayPhase) -> CritInfo {
    let speed = phase.apply_stat_bonus(stats).speed;
    let base_chance = CRIT_CAP.min(f64::from(speed) / 10.0);
    CritInfo {
        speed,
        base_chance,
        with_move_bonus: (base_chance + CRIT_MOVE_BONUS).min(CRIT_BONUS_CAP),
    }
}
