use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ElementType {
    Grass,
    Oil,
    Light,
    Star,
    Bonk,
    Mod,
    Imagination,
    Miwiwi,
    #[strum(to_string = "Crude Oil", serialize = "CrudeOil", serialize = "crude_oil")]
    CrudeOil,
    Catgirl,
    Car,
    Miwawa,
    Human,
    /// Carried only by the synthetic "Skip Turn" move.
    Neutral,
}

impl ElementType {
    /// Raw chart entry for an attacking type against a single defending type.
    ///
    /// The chart is sparse and directed: `(a, b)` having an entry says nothing
    /// about `(b, a)`. `None` means the pairing is neutral.
    pub fn chart_entry(attacking: ElementType, defending: ElementType) -> Option<f64> {
        use ElementType::*;

        let value = match (attacking, defending) {
            (Grass, Oil) => 1.4,
            (Grass, Light) => 0.6,
            (Grass, Car) => 1.8,
            (Grass, Human) => 1.2,

            (Oil, Catgirl) => 1.7,
            (Oil, Bonk) => 0.7,
            (Oil, Grass) => 1.9,
            (Oil, Light) => 0.8,

            (Light, Imagination) => 1.6,
            (Light, Grass) => 1.9,
            (Light, Human) => 1.1,
            (Light, Car) => 1.3,
            (Light, Star) => 0.5,

            (Star, Human) => 1.5,
            (Star, Imagination) => 1.6,
            (Star, Light) => 0.6,
            (Star, Bonk) => 1.3,

            (Bonk, Star) => 1.8,
            (Bonk, Light) => 1.7,
            (Bonk, Oil) => 0.5,
            (Bonk, Human) => 1.4,

            (Mod, Miwiwi) => 2.0,
            (Mod, Miwawa) => 2.0,
            (Mod, CrudeOil) => 0.5,
            (Mod, Human) => 1.6,

            (Imagination, Catgirl) => 1.7,
            (Imagination, Human) => 1.5,
            (Imagination, Mod) => 0.6,
            (Imagination, Car) => 1.3,

            (Miwiwi, Car) => 2.0,
            (Miwiwi, Oil) => 1.9,
            (Miwiwi, Star) => 0.5,
            (Miwiwi, Grass) => 1.2,

            (CrudeOil, Catgirl) => 2.0,
            (CrudeOil, Grass) => 0.5,
            (CrudeOil, Car) => 0.5,
            (CrudeOil, Light) => 1.3,

            (Catgirl, Human) => 1.7,
            (Catgirl, Miwawa) => 2.0,
            (Catgirl, Car) => 0.6,
            (Catgirl, Imagination) => 1.2,

            (Car, Miwiwi) => 1.7,
            (Car, Mod) => 1.8,
            (Car, Oil) => 0.6,
            (Car, Grass) => 0.7,

            (Miwawa, Miwiwi) => 0.6,
            (Miwawa, Catgirl) => 1.8,
            (Miwawa, Imagination) => 0.6,
            (Miwawa, Bonk) => 1.2,

            (Human, Bonk) => 1.5,
            (Human, Imagination) => 1.6,
            (Human, Star) => 0.7,
            (Human, Catgirl) => 0.8,

            _ => return None,
        };
        Some(value)
    }

    /// Multiplier for an attacking type against one defending type.
    /// Pairings absent from the chart are exactly 1.0.
    pub fn type_effectiveness(attacking: ElementType, defending: ElementType) -> f64 {
        Self::chart_entry(attacking, defending).unwrap_or(1.0)
    }

    /// Combined multiplier against a (possibly dual-typed) defender: the
    /// product of the per-type lookups.
    pub fn effectiveness_against(attacking: ElementType, defending: &[ElementType]) -> f64 {
        defending
            .iter()
            .map(|&defender| Self::type_effectiveness(attacking, defender))
            .product()
    }
}
