//! Legacy per-entry drop tables
//!
//! Every entry drops on its own chance; an optional rule tops the result up
//! when nothing of the wanted category and rarity dropped.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weighted::{chance, pick_index};
use super::zone::{EnemyTier, ItemRarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemCategory {
    #[default]
    Equipment,
    Consumable,
    Material,
    Misc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    pub item: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(default)]
    pub rarity: ItemRarity,
    /// Independent drop chance, clamped to `[0, 1]` when rolled
    pub chance: f32,
}

impl DropEntry {
    pub fn new(item: impl Into<String>, category: ItemCategory, rarity: ItemRarity, chance: f32) -> Self {
        Self { item: item.into(), category, rarity, chance }
    }

    fn meets(&self, category: ItemCategory, min_rarity: ItemRarity) -> bool {
        self.category == category && self.rarity >= min_rarity
    }
}

/// Top-up rule applied after the normal rolls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuaranteedDropRule {
    pub enabled: bool,
    pub category: ItemCategory,
    pub min_rarity: ItemRarity,
    pub rolls: u32,
}

impl Default for GuaranteedDropRule {
    fn default() -> Self {
        Self {
            enabled: false,
            category: ItemCategory::Equipment,
            min_rarity: ItemRarity::Rare,
            rolls: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTable {
    pub id: String,
    pub trash_drops: Vec<DropEntry>,
    pub normal_drops: Vec<DropEntry>,
    pub elite_drops: Vec<DropEntry>,
    pub mini_boss_drops: Vec<DropEntry>,
    pub guaranteed: GuaranteedDropRule,
}

impl DropTable {
    pub fn drops_for(&self, tier: EnemyTier) -> &[DropEntry] {
        match tier {
            EnemyTier::Trash => &self.trash_drops,
            EnemyTier::Normal => &self.normal_drops,
            EnemyTier::Elite => &self.elite_drops,
            EnemyTier::MiniBoss => &self.mini_boss_drops,
        }
    }

    /// Roll every entry for the tier, then apply the guaranteed rule
    pub fn roll(&self, tier: EnemyTier, rng: &mut impl Rng) -> Vec<DropEntry> {
        let entries = self.drops_for(tier);
        let mut results: Vec<DropEntry> = entries
            .iter()
            .filter(|e| !e.item.trim().is_empty())
            .filter(|e| chance(e.chance, rng))
            .cloned()
            .collect();

        self.apply_guaranteed(entries, &mut results, rng);
        results
    }

    fn apply_guaranteed(&self, entries: &[DropEntry], results: &mut Vec<DropEntry>, rng: &mut impl Rng) {
        let rule = self.guaranteed;
        if !rule.enabled {
            return;
        }
        if rule.rolls == 0 {
            log::warn!("Drop table '{}' has a guaranteed rule with no rolls", self.id);
            return;
        }

        let satisfied = |results: &[DropEntry]| results.iter().any(|e| e.meets(rule.category, rule.min_rarity));
        if satisfied(results) {
            return;
        }

        let eligible: Vec<&DropEntry> = entries
            .iter()
            .filter(|e| !e.item.trim().is_empty() && e.meets(rule.category, rule.min_rarity))
            .collect();
        if eligible.is_empty() {
            log::warn!(
                "Drop table '{}' guarantees {:?} of {} or better but has no such entries",
                self.id,
                rule.category,
                rule.min_rarity
            );
            return;
        }

        for _ in 0..rule.rolls {
            if satisfied(results) {
                break;
            }
            results.push(eligible[pick_index(eligible.len(), rng)].clone());
        }
    }
}
