//! Loot tables
//!
//! Weighted lists of base items and rarities, rolled once per drop.

use serde::{Deserialize, Serialize};

/// `Zone<N>` prefix of a table id, e.g. `Zone1` for `Zone1_Elite` or `Zone9Elite`
pub fn zone_prefix(id: &str) -> Option<&str> {
    let id = id.trim();
    if !id.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("zone")) {
        return None;
    }
    let digits = id[4..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(&id[..4 + digits])
}

/// Base item with its relative weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedItem {
    pub item: String,
    pub weight: f32,
}

/// Rarity with its relative weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRarity {
    pub rarity: String,
    pub weight: f32,
}

/// A weighted drop table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub id: String,
    #[serde(default)]
    pub items: Vec<WeightedItem>,
    #[serde(default)]
    pub rarities: Vec<WeightedRarity>,
    /// When non-empty, affixes are drawn from these ids only
    #[serde(default)]
    pub affix_pool_override: Vec<String>,
}

impl LootTable {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn with_item(mut self, item: impl Into<String>, weight: f32) -> Self {
        self.items.push(WeightedItem { item: item.into(), weight });
        self
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>, weight: f32) -> Self {
        self.rarities.push(WeightedRarity { rarity: rarity.into(), weight });
        self
    }

    /// Clamp negative weights to zero
    pub fn normalize(&mut self) {
        for e in &mut self.items {
            e.weight = e.weight.max(0.0);
        }
        for e in &mut self.rarities {
            e.weight = e.weight.max(0.0);
        }
    }

    pub fn zone_prefix(&self) -> Option<&str> {
        zone_prefix(&self.id)
    }

    pub fn total_item_weight(&self) -> f32 {
        self.items.iter().map(|e| e.weight.max(0.0)).sum()
    }

    pub fn total_rarity_weight(&self) -> f32 {
        self.rarities.iter().map(|e| e.weight.max(0.0)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_prefix() {
        assert_eq!(LootTable::new("Zone1_Trash").zone_prefix(), Some("Zone1"));
        assert_eq!(LootTable::new("zone2").zone_prefix(), Some("zone2"));
        assert_eq!(LootTable::new("Starter").zone_prefix(), None);
        assert_eq!(LootTable::new("Zo").zone_prefix(), None);
        assert_eq!(LootTable::new("Zone9Elite").zone_prefix(), Some("Zone9"));
        assert_eq!(LootTable::new("Zone12_Boss").zone_prefix(), Some("Zone12"));
        assert_eq!(LootTable::new("Zone_Boss").zone_prefix(), None);
        assert_eq!(LootTable::new("Zones").zone_prefix(), None);
    }

    #[test]
    fn test_normalize_clamps_weights() {
        let mut table = LootTable::new("T").with_item("a", -1.0).with_rarity("Common", -5.0);
        table.normalize();
        assert_eq!(table.items[0].weight, 0.0);
        assert_eq!(table.total_rarity_weight(), 0.0);
    }
}
