//! Tier loot buckets
//!
//! Additive material style drops chosen by enemy loot tier.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weighted::{roll_int_range, roll_weighted_int};
use crate::items::ItemInstance;

/// Number of loot tiers with their own bucket
pub const BUCKET_TIERS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub item: String,
    pub weight: i32,
    #[serde(default = "default_qty")]
    pub min_qty: i32,
    #[serde(default = "default_qty")]
    pub max_qty: i32,
}

fn default_qty() -> i32 {
    1
}

impl BucketEntry {
    pub fn new(item: impl Into<String>, weight: i32, min_qty: i32, max_qty: i32) -> Self {
        Self { item: item.into(), weight, min_qty, max_qty }
    }

    /// Quantity bounds, at least one
    pub fn qty_range(&self) -> (u32, u32) {
        let min = self.min_qty.max(1) as u32;
        let max = (self.max_qty.max(0) as u32).max(min);
        (min, max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierLootBucket {
    pub tier: u32,
    #[serde(default)]
    pub entries: Vec<BucketEntry>,
}

impl TierLootBucket {
    /// Pick one entry by integer weight and emit `qty` plain Common instances
    pub fn roll(&self, item_level: u32, rng: &mut impl Rng) -> Vec<ItemInstance> {
        let Some(entry) = roll_weighted_int(&self.entries, |e| e.weight, rng) else {
            return Vec::new();
        };
        if entry.item.trim().is_empty() {
            return Vec::new();
        }

        let (min, max) = entry.qty_range();
        let qty = roll_int_range(min, max, rng);
        log::debug!("Tier {} bucket rolled {} x{}", self.tier, entry.item, qty);

        (0..qty).map(|_| ItemInstance::common(entry.item.clone(), item_level)).collect()
    }
}

/// Buckets for loot tiers 1 through 5
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierLootConfig {
    pub buckets: Vec<TierLootBucket>,
}

impl TierLootConfig {
    /// Bucket for a loot tier, clamped to `1..=5`
    pub fn bucket(&self, loot_tier: u32) -> Option<&TierLootBucket> {
        let tier = loot_tier.clamp(1, BUCKET_TIERS);
        self.buckets.iter().find(|b| b.tier == tier)
    }

    pub fn roll(&self, loot_tier: u32, item_level: u32, rng: &mut impl Rng) -> Vec<ItemInstance> {
        match self.bucket(loot_tier) {
            Some(bucket) => bucket.roll(item_level, rng),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> TierLootConfig {
        TierLootConfig {
            buckets: vec![
                TierLootBucket { tier: 1, entries: vec![BucketEntry::new("Scrap", 1, 0, 0)] },
                TierLootBucket {
                    tier: 5,
                    entries: vec![BucketEntry::new("Shard", 0, 1, 1), BucketEntry::new("Core", 4, 2, 3)],
                },
            ],
        }
    }

    #[test]
    fn test_bucket_tier_clamped() {
        let cfg = config();
        assert_eq!(cfg.bucket(0).map(|b| b.tier), Some(1));
        assert_eq!(cfg.bucket(42).map(|b| b.tier), Some(5));
        assert!(cfg.bucket(3).is_none());
    }

    #[test]
    fn test_quantity_at_least_one() {
        let mut rng = StdRng::seed_from_u64(11);
        let drops = config().roll(1, 0, &mut rng);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].base_item_id, "Scrap");
        assert_eq!(drops[0].rarity_id, "Common");
        assert_eq!(drops[0].item_level, 1);
        assert_eq!(drops[0].base_scalar, 1.0);
        assert!(drops[0].affixes.is_empty());
    }

    #[test]
    fn test_weighted_entry_and_range() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..50 {
            let drops = config().roll(7, 4, &mut rng);
            assert!((2..=3).contains(&drops.len()));
            assert!(drops.iter().all(|d| d.base_item_id == "Core" && d.item_level == 4));
        }
    }

    #[test]
    fn test_qty_range() {
        assert_eq!(BucketEntry::new("x", 1, 3, 1).qty_range(), (3, 3));
        assert_eq!(BucketEntry::new("x", 1, -2, 4).qty_range(), (1, 4));
    }

    #[test]
    fn test_weightless_bucket_drops_nothing() {
        let mut rng = StdRng::seed_from_u64(13);
        let bucket = TierLootBucket { tier: 2, entries: vec![BucketEntry::new("x", 0, 1, 1)] };
        assert!(bucket.roll(1, &mut rng).is_empty());
    }
}
