//! Loot rolling
//!
//! Weighted selection, the loot table roller and the systems layered on top
//! of it: zone tuning, threat, tier buckets, set drops, zone tables and
//! legacy tables.

pub mod weighted;
pub mod table;
pub mod roller;
pub mod tuning;
pub mod threat;
pub mod buckets;
pub mod drops;
pub mod set_drops;
pub mod zone;
pub mod drop_table;

pub use weighted::{roll_weighted, roll_range, roll_int_range};
pub use table::{LootTable, WeightedItem, WeightedRarity, zone_prefix};
pub use roller::{roll_item, roll_specific, roll_item_with_zone_tuning, eligible_affix_pool, affix_count};
pub use tuning::{LootTier, RarityWeights, ItemLevelRange, ZoneLootTuning, clamp_loot_tier};
pub use threat::{ThreatDistanceConfig, ThreatLootScaling, ThreatLootTier, quantize_clamp_threat, threat_to_step_index};
pub use buckets::{TierLootBucket, TierLootConfig, BucketEntry};
pub use drops::{EnemyDropContext, EnemyDrops, DropBonusConfig, roll_enemy_drops, roll_enemy_drops_with_pity};
pub use set_drops::{SetDropConfig, SetDropTier, BossPityConfig, SetDropPity, roll_set_drops};
pub use zone::{ZoneLootTable, ZonePoolEntry, ItemRarity, EnemyTier, RarityChances, roll_zone, apply_boss_overrides};
pub use drop_table::{DropTable, DropEntry, GuaranteedDropRule, ItemCategory};
