//! The built-in character catalog.
//!
//! Character templates ship as RON embedded in the binary and are validated
//! once on first access.

use crate::battle::rng::BattleRng;
use crate::errors::{CatalogError, CatalogResult};
use schema::{CharacterTemplate, SKIP_TURN};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

const CHARACTERS_RON: &str = include_str!("../data/characters.ron");

static BUILTIN_CATALOG: LazyLock<CatalogResult<Catalog>> = LazyLock::new(|| Catalog::from_ron_str(CHARACTERS_RON));

/// The catalog shipped with the crate.
pub fn builtin_catalog() -> CatalogResult<&'static Catalog> {
    BUILTIN_CATALOG.as_ref().map_err(Clone::clone)
}

#[derive(Debug, Clone)]
pub struct Catalog {
    characters: BTreeMap<String, CharacterTemplate>,
    // Names in file order, for listings.
    order: Vec<String>,
}

impl Catalog {
    /// Parses and validates a RON list of character templates.
    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let templates: Vec<CharacterTemplate> =
            ron::from_str(source).map_err(|e| CatalogError::MalformedData(e.to_string()))?;
        Self::from_templates(templates)
    }

    pub fn from_templates(templates: Vec<CharacterTemplate>) -> CatalogResult<Self> {
        let mut characters = BTreeMap::new();
        let mut order = Vec::with_capacity(templates.len());
        for template in templates {
            validate(&template)?;
            if characters.contains_key(&template.name) {
                return Err(invalid(&template, "duplicate character name"));
            }
            order.push(template.name.clone());
            characters.insert(template.name.clone(), template);
        }
        debug!(count = order.len(), "character catalog loaded");
        Ok(Self { characters, order })
    }

    pub fn get(&self, name: &str) -> CatalogResult<&CharacterTemplate> {
        self.characters
            .get(name)
            .ok_or_else(|| CatalogError::CharacterNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Picks uniformly among every character except `exclude`.
    pub fn random_opponent(&self, exclude: &str, rng: &mut dyn BattleRng) -> CatalogResult<&CharacterTemplate> {
        let candidates: Vec<&str> = self.names().filter(|name| *name != exclude).collect();
        if candidates.is_empty() {
            return Err(CatalogError::NoOpponentAvailable(exclude.to_string()));
        }
        let pick = candidates[rng.pick_index(candidates.len(), "random opponent")];
        self.get(pick)
    }
}

fn invalid(template: &CharacterTemplate, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidCharacter {
        name: template.name.clone(),
        reason: reason.into(),
    }
}

fn validate(template: &CharacterTemplate) -> CatalogResult<()> {
    if template.types.is_empty() || template.types.len() > 2 {
        return Err(invalid(template, format!("expected 1 or 2 types, found {}", template.types.len())));
    }
    if template.moves.is_empty() {
        return Err(invalid(template, "empty move roster"));
    }
    let mut seen = HashSet::new();
    for move_data in &template.moves {
        if move_data.name == SKIP_TURN || move_data.is_skip() {
            return Err(invalid(template, "\"Skip Turn\" is reserved"));
        }
        if move_data.accuracy > 100 {
            return Err(invalid(template, format!("{} has accuracy {}", move_data.name, move_data.accuracy)));
        }
        if !seen.insert(move_data.name.as_str()) {
            return Err(invalid(template, format!("duplicate move {}", move_data.name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;
    use pretty_assertions::assert_eq;
    use schema::ElementType;

    #[test]
    fn builtin_catalog_loads_all_characters() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec![
                "bushy0225",
                "star5084",
                "Mika ga Hoshii",
                "Mika",
                "Jay",
                "Belisarius",
                "car_tanle",
                "Mutthunter1"
            ]
        );
        for name in catalog.names() {
            let template = catalog.get(name).unwrap();
            assert_eq!(template.moves.len(), 5);
            let fifth = &template.moves[4];
            assert!(fifth.is_special || fifth.is_ultimate, "{name} fifth move is unflagged");
        }
    }

    #[test]
    fn builtin_entries_match_source_values() {
        let catalog = builtin_catalog().unwrap();
        let star = catalog.get("star5084").unwrap();
        assert_eq!(star.types, vec![ElementType::Light, ElementType::CrudeOil]);
        assert_eq!(star.base_stats.special_attack, 130);
        assert_eq!(star.cheapest_move_cost(), Some(12));

        let bushy = catalog.get("bushy0225").unwrap();
        assert_eq!(bushy.base_stats.energy_regen, 12);
        assert_eq!(bushy.find_move("Solar Beam").map(|m| m.power), Some(90));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(
            catalog.get("Nobody").unwrap_err(),
            CatalogError::CharacterNotFound("Nobody".to_string())
        );
    }

    #[test]
    fn random_opponent_skips_the_player() {
        let catalog = builtin_catalog().unwrap();
        // Index 0 among the seven others is star5084 once bushy0225 is excluded.
        let mut rng = ScriptedRng::new_for_test(vec![0.0, 0.99]);
        assert_eq!(catalog.random_opponent("bushy0225", &mut rng).unwrap().name, "star5084");
        assert_eq!(catalog.random_opponent("bushy0225", &mut rng).unwrap().name, "Mutthunter1");
    }

    #[test]
    fn lone_character_has_no_opponent() {
        let source = r#"[(
            name: "Solo",
            types: [Human],
            base_stats: (hp: 100, attack: 50, defense: 50, special_attack: 50, special_defense: 50,
                         speed: 50, max_energy: 100, energy_regen: 10),
            moves: [(name: "Jab", power: 30, move_type: Human, accuracy: 100, effect: Physical, energy_cost: 5)],
        )]"#;
        let catalog = Catalog::from_ron_str(source).unwrap();
        let mut rng = ScriptedRng::new_for_test(vec![]);
        assert!(matches!(
            catalog.random_opponent("Solo", &mut rng),
            Err(CatalogError::NoOpponentAvailable(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_rosters() {
        let template = |types: &str, moves: &str| {
            format!(
                r#"[(name: "Bad", types: [{types}],
                    base_stats: (hp: 1, attack: 1, defense: 1, special_attack: 1, special_defense: 1,
                                 speed: 1, max_energy: 1, energy_regen: 1),
                    moves: [{moves}])]"#
            )
        };
        let jab = r#"(name: "Jab", power: 30, move_type: Human, accuracy: 100, effect: Physical, energy_cost: 5)"#;
        let skip = r#"(name: "Skip Turn", power: 0, move_type: Neutral, accuracy: 100, effect: SkipTurn, energy_cost: 0)"#;
        let wild = r#"(name: "Wild", power: 30, move_type: Human, accuracy: 101, effect: Physical, energy_cost: 5)"#;

        let cases = [
            template("", jab),
            template("Human, Bonk, Mod", jab),
            template("Human", ""),
            template("Human", &format!("{jab}, {jab}")),
            template("Human", skip),
            template("Human", wild),
        ];
        for source in cases {
            assert!(
                matches!(Catalog::from_ron_str(&source), Err(CatalogError::InvalidCharacter { .. })),
                "accepted: {source}"
            );
        }

        assert!(matches!(
            Catalog::from_ron_str("not ron"),
            Err(CatalogError::MalformedData(_))
        ));
    }
}
