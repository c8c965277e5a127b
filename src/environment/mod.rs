//! Weather and time-of-day state shared by both combatants.

pub mod clock;
pub mod day_phase;
pub mod weather;

pub use clock::{Clock, FixedClock, SystemClock};
pub use day_phase::{DayPhase, PHASE_TYPE_BONUS};
pub use weather::{Weather, WeatherKind};

use crate::battle::rng::BattleRng;
use schema::ElementType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Weather,
    pub day_phase: DayPhase,
}

impl Environment {
    pub fn new(weather: Weather, day_phase: DayPhase) -> Self {
        Self { weather, day_phase }
    }

    /// Draws starting weather and reads the phase from `clock`.
    pub fn from_clock(rng: &mut dyn BattleRng, clock: &dyn Clock) -> Self {
        let hour = clock.current_hour();
        Self {
            weather: Weather::new(rng, hour),
            day_phase: DayPhase::from_hour(hour),
        }
    }

    /// Re-derives the day phase. Returns true if it changed.
    pub fn refresh_phase(&mut self, clock: &dyn Clock) -> bool {
        let phase = DayPhase::from_hour(clock.current_hour());
        let changed = phase != self.day_phase;
        self.day_phase = phase;
        changed
    }

    pub fn weather_multiplier(&self, move_type: ElementType) -> f64 {
        self.weather.get_multiplier(move_type)
    }
}
