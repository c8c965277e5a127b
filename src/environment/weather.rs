use crate::battle::rng::BattleRng;
use schema::ElementType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

/// Weather lasts a random number of turns in this inclusive range.
pub const WEATHER_DURATION: (u32, u32) = (3, 6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum WeatherKind {
    Clear,
    Sunny,
    Rainy,
    Windy,
    Stormy,
    Misty,
}

impl WeatherKind {
    pub fn boosted_types(self) -> &'static [ElementType] {
        use ElementType::*;
        match self {
            WeatherKind::Clear => &[Human],
            WeatherKind::Sunny => &[Light, Star],
            WeatherKind::Rainy => &[Oil, CrudeOil, Grass],
            WeatherKind::Windy => &[Imagination, Catgirl],
            WeatherKind::Stormy => &[Bonk, Mod],
            WeatherKind::Misty => &[Miwiwi, Miwawa],
        }
    }

    pub fn boost_percent(self) -> u32 {
        match self {
            WeatherKind::Clear => 15,
            WeatherKind::Sunny => 30,
            WeatherKind::Rainy => 35,
            WeatherKind::Windy => 20,
            WeatherKind::Stormy => 40,
            WeatherKind::Misty => 28,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            WeatherKind::Clear => "The weather is clear and calm.",
            WeatherKind::Sunny => "Brilliant sunshine floods the battlefield!",
            WeatherKind::Rainy => "Torrential rain pounds the battlefield!",
            WeatherKind::Windy => "Fierce winds howl across the battlefield!",
            WeatherKind::Stormy => "A violent storm rages with thunder and lightning!",
            WeatherKind::Misty => "Dense mist shrouds the battlefield!",
        }
    }

    /// Sunny weather cannot be drawn between 22:00 and 06:00.
    pub fn is_available_at(self, hour: u32) -> bool {
        match self {
            WeatherKind::Sunny => !(hour >= 22 || hour < 6),
            _ => true,
        }
    }

    /// Kinds that may be drawn at `hour`, in declaration order.
    pub fn available_at(hour: u32) -> Vec<WeatherKind> {
        WeatherKind::iter().filter(|kind| kind.is_available_at(hour)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    kind: WeatherKind,
    duration: u32,
}

impl Weather {
    /// Draws an initial kind and duration.
    pub fn new(rng: &mut dyn BattleRng, hour: u32) -> Self {
        let kind = Self::draw_kind(rng, hour);
        let duration = Self::draw_duration(rng);
        Self { kind, duration }
    }

    pub fn with_kind(kind: WeatherKind, duration: u32) -> Self {
        Self { kind, duration }
    }

    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// `1 + boost/100` when `move_type` is boosted by the current kind.
    pub fn get_multiplier(&self, move_type: ElementType) -> f64 {
        if self.kind.boosted_types().contains(&move_type) {
            1.0 + f64::from(self.kind.boost_percent()) / 100.0
        } else {
            1.0
        }
    }

    /// Advances one turn. When the duration runs out a new kind and duration
    /// are drawn. Returns true if the kind changed.
    pub fn tick(&mut self, rng: &mut dyn BattleRng, hour: u32) -> bool {
        if self.duration == 0 {
            return false;
        }
        self.duration -= 1;
        if self.duration > 0 {
            return false;
        }

        let old = self.kind;
        self.kind = Self::draw_kind(rng, hour);
        self.duration = Self::draw_duration(rng);
        debug!(from = %old, to = %self.kind, duration = self.duration, "weather redrawn");
        old != self.kind
    }

    fn draw_kind(rng: &mut dyn BattleRng, hour: u32) -> WeatherKind {
        let allowed = WeatherKind::available_at(hour);
        allowed[rng.pick_index(allowed.len(), "weather kind")]
    }

    fn draw_duration(rng: &mut dyn BattleRng) -> u32 {
        rng.range_inclusive(WEATHER_DURATION.0, WEATHER_DURATION.1, "weather duration")
    }
}
