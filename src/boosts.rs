//! Permanent, cross-battle stat boosts keyed by character name.
//!
//! Boosts are read once when a combatant is built for a battle and written
//! back only when a permanent item is used. A character with no record has
//! zero boosts; a store that cannot be read is treated as empty.

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strum::Display;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermanentBoosts {
    pub hp_boost: u32,
    pub mp_boost: u32,
    pub attack_boost: u32,
    pub defense_boost: u32,
}

impl PermanentBoosts {
    pub fn get(&self, kind: BoostKind) -> u32 {
        match kind {
            BoostKind::Hp => self.hp_boost,
            BoostKind::Mp => self.mp_boost,
            BoostKind::Attack => self.attack_boost,
            BoostKind::Defense => self.defense_boost,
        }
    }

    fn slot_mut(&mut self, kind: BoostKind) -> &mut u32 {
        match kind {
            BoostKind::Hp => &mut self.hp_boost,
            BoostKind::Mp => &mut self.mp_boost,
            BoostKind::Attack => &mut self.attack_boost,
            BoostKind::Defense => &mut self.defense_boost,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BoostKind {
    #[strum(to_string = "HP")]
    Hp,
    #[strum(to_string = "MP")]
    Mp,
    Attack,
    Defense,
}

/// Read/add access to persisted permanent boosts.
pub trait BoostStore {
    /// Boosts for a character; zeros when there is no record.
    fn boosts_for(&self, character: &str) -> PermanentBoosts;

    /// Adds `amount` to one boost and persists it. Returns the new total.
    fn add_boost(&mut self, character: &str, kind: BoostKind, amount: u32) -> u32;

    fn reset_character(&mut self, character: &str);

    fn reset_all(&mut self);
}

/// In-memory store, used for tests and sessions without a save file.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoostStore {
    records: BTreeMap<String, PermanentBoosts>,
}

impl MemoryBoostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoostStore for MemoryBoostStore {
    fn boosts_for(&self, character: &str) -> PermanentBoosts {
        self.records.get(character).copied().unwrap_or_default()
    }

    fn add_boost(&mut self, character: &str, kind: BoostKind, amount: u32) -> u32 {
        add_to_records(&mut self.records, character, kind, amount)
    }

    fn reset_character(&mut self, character: &str) {
        self.records.remove(character);
    }

    fn reset_all(&mut self) {
        self.records.clear();
    }
}

/// Store backed by a pretty-printed JSON file mapping character name to boosts.
#[derive(Debug, Clone)]
pub struct JsonBoostStore {
    path: PathBuf,
    records: BTreeMap<String, PermanentBoosts>,
}

impl JsonBoostStore {
    /// Opens the store at `path`. A missing or unreadable file yields an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match Self::read_records(&path) {
            Ok(records) => records,
            Err(err) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %err, "ignoring unreadable boost store");
                }
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), characters = records.len(), "opened boost store");
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(path: &Path) -> Result<BTreeMap<String, PermanentBoosts>, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_records(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.write_records() {
            warn!(path = %self.path.display(), error = %err, "failed to save boost store");
        }
    }
}

impl BoostStore for JsonBoostStore {
    fn boosts_for(&self, character: &str) -> PermanentBoosts {
        self.records.get(character).copied().unwrap_or_default()
    }

    fn add_boost(&mut self, character: &str, kind: BoostKind, amount: u32) -> u32 {
        let total = add_to_records(&mut self.records, character, kind, amount);
        self.persist();
        total
    }

    fn reset_character(&mut self, character: &str) {
        if self.records.remove(character).is_some() {
            self.persist();
        }
    }

    fn reset_all(&mut self) {
        self.records.clear();
        self.persist();
    }
}

fn add_to_records(
    records: &mut BTreeMap<String, PermanentBoosts>,
    character: &str,
    kind: BoostKind,
    amount: u32,
) -> u32 {
    let boosts = records.entry(character.to_string()).or_default();
    let slot = boosts.slot_mut(kind);
    *slot = slot.saturating_add(amount);
    debug!(character, %kind, amount, total = *slot, "permanent boost added");
    *slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_character_has_zero_boosts() {
        let store = MemoryBoostStore::new();
        assert!(store.boosts_for("Jay").is_empty());
    }

    #[test]
    fn boosts_accumulate_per_kind() {
        let mut store = MemoryBoostStore::new();
        assert_eq!(store.add_boost("Jay", BoostKind::Hp, 25), 25);
        assert_eq!(store.add_boost("Jay", BoostKind::Hp, 25), 50);
        assert_eq!(store.add_boost("Jay", BoostKind::Attack, 3), 3);

        let boosts = store.boosts_for("Jay");
        assert_eq!(boosts.hp_boost, 50);
        assert_eq!(boosts.attack_boost, 3);
        assert_eq!(boosts.mp_boost, 0);

        store.reset_character("Jay");
        assert!(store.boosts_for("Jay").is_empty());
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves").join("boosts.json");

        let mut store = JsonBoostStore::open(&path);
        store.add_boost("Mika", BoostKind::Hp, 25);
        store.add_boost("Mika", BoostKind::Hp, 25);
        store.add_boost("Belisarius", BoostKind::Mp, 10);

        let reopened = JsonBoostStore::open(&path);
        assert_eq!(reopened.boosts_for("Mika").hp_boost, 50);
        assert_eq!(reopened.boosts_for("Belisarius").mp_boost, 10);
    }

    #[test]
    fn corrupt_json_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boosts.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonBoostStore::open(&path);
        assert!(store.boosts_for("Mika").is_empty());
    }

    #[test]
    fn records_without_every_field_default_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boosts.json");
        std::fs::write(&path, r#"{"Jay": {"hp_boost": 10}}"#).unwrap();

        let store = JsonBoostStore::open(&path);
        assert_eq!(
            store.boosts_for("Jay"),
            PermanentBoosts {
                hp_boost: 10,
                ..PermanentBoosts::default()
            }
        );
    }
}
