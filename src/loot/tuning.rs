//! Zone loot tuning
//!
//! Per-tier rarity weights and item level ranges for a zone, plus the
//! enemy loot tier multipliers applied on top of them.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::table::zone_prefix;
use super::weighted::roll_int_range;

/// Zone difficulty band of a loot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LootTier {
    #[default]
    Trash,
    Elite,
    Boss,
}

impl LootTier {
    /// Resolve from a table id: "Boss" anywhere wins over "Elite"
    pub fn from_table_id(id: &str) -> Self {
        let lower = id.to_ascii_lowercase();
        if lower.contains("boss") {
            LootTier::Boss
        } else if lower.contains("elite") {
            LootTier::Elite
        } else {
            LootTier::Trash
        }
    }

    /// Parse a CLI / content label, unknown labels are Trash
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "boss" => LootTier::Boss,
            "elite" => LootTier::Elite,
            _ => LootTier::Trash,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LootTier::Trash => "Trash",
            LootTier::Elite => "Elite",
            LootTier::Boss => "Boss",
        }
    }
}

impl fmt::Display for LootTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weights for the six canonical rarities
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RarityWeights {
    pub common: f32,
    pub uncommon: f32,
    pub magic: f32,
    pub rare: f32,
    pub epic: f32,
    pub legendary: f32,
}

impl RarityWeights {
    pub fn new(common: f32, uncommon: f32, magic: f32, rare: f32, epic: f32, legendary: f32) -> Self {
        Self { common, uncommon, magic, rare, epic, legendary }
    }

    /// Weight for a rarity id (case-insensitive). Non-canonical ids weigh 0.
    pub fn weight(&self, rarity_id: &str) -> f32 {
        match rarity_id.trim().to_ascii_lowercase().as_str() {
            "common" => self.common,
            "uncommon" => self.uncommon,
            "magic" => self.magic,
            "rare" => self.rare,
            "epic" => self.epic,
            "legendary" => self.legendary,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> f32 {
        [self.common, self.uncommon, self.magic, self.rare, self.epic, self.legendary]
            .iter()
            .map(|w| w.max(0.0))
            .sum()
    }

    /// Shift toward rarer drops for enemy loot tiers 2..=5. Other tiers leave the weights as is.
    pub fn apply_loot_tier(&mut self, loot_tier: u32) {
        let (common, uncommon, rare, epic) = match loot_tier {
            2 => (0.95, 1.10, 1.20, 1.05),
            3 => (0.90, 1.20, 1.45, 1.15),
            4 => (0.80, 1.30, 1.75, 1.30),
            5 => (0.65, 1.45, 2.20, 1.55),
            _ => return,
        };
        self.common *= common;
        self.uncommon *= uncommon;
        self.rare *= rare;
        self.epic *= epic;
    }
}

/// Clamp an authored enemy loot tier to `1..=999`
pub fn clamp_loot_tier(tier: i32) -> u32 {
    tier.clamp(1, 999) as u32
}

/// Inclusive item level range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLevelRange {
    pub min: i32,
    pub max: i32,
}

impl Default for ItemLevelRange {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

impl ItemLevelRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn clamp_min(&self) -> u32 {
        self.min.max(1) as u32
    }

    pub fn clamp_max(&self) -> u32 {
        (self.max.max(1) as u32).max(self.clamp_min())
    }

    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        roll_int_range(self.clamp_min(), self.clamp_max(), rng)
    }
}

/// Rarity weights and item levels for each tier of one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLootTuning {
    pub zone_id: String,
    pub trash_weights: RarityWeights,
    pub elite_weights: RarityWeights,
    pub boss_weights: RarityWeights,
    pub trash_item_level: ItemLevelRange,
    pub elite_item_level: ItemLevelRange,
    pub boss_item_level: ItemLevelRange,
}

impl ZoneLootTuning {
    pub fn weights(&self, tier: LootTier) -> RarityWeights {
        match tier {
            LootTier::Trash => self.trash_weights,
            LootTier::Elite => self.elite_weights,
            LootTier::Boss => self.boss_weights,
        }
    }

    pub fn item_level(&self, tier: LootTier) -> ItemLevelRange {
        match tier {
            LootTier::Trash => self.trash_item_level,
            LootTier::Elite => self.elite_item_level,
            LootTier::Boss => self.boss_item_level,
        }
    }

    /// Whether a table id belongs to this zone (case-insensitive prefix)
    pub fn applies_to(&self, table_id: &str) -> bool {
        let zone = self.zone_id.trim();
        !zone.is_empty() && zone_prefix(table_id).is_some_and(|p| p.eq_ignore_ascii_case(zone))
    }
}
