//! Raw content collections as stored on disk

use serde::{Deserialize, Serialize};

use crate::items::{AffixDefinition, AffixPool, ItemDefinition, ItemSetDefinition, RarityDefinition};
use crate::loot::{
    DropBonusConfig, DropTable, LootTable, SetDropConfig, ThreatDistanceConfig, ThreatLootScaling, TierLootConfig,
    ZoneLootTable, ZoneLootTuning,
};

/// Threat distance steps and loot scaling, stored together in `threat.ron`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatSettings {
    pub distance: ThreatDistanceConfig,
    pub scaling: Option<ThreatLootScaling>,
}

/// Every content collection, one field per data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootContent {
    pub items: Vec<ItemDefinition>,
    pub rarities: Vec<RarityDefinition>,
    pub affixes: Vec<AffixDefinition>,
    pub affix_pools: Vec<AffixPool>,
    pub tables: Vec<LootTable>,
    pub sets: Vec<ItemSetDefinition>,
    pub zone_tunings: Vec<ZoneLootTuning>,
    pub threat: ThreatSettings,
    pub tier_loot: Option<TierLootConfig>,
    pub drop_bonus: DropBonusConfig,
    pub set_drops: Vec<SetDropConfig>,
    pub zone_tables: Vec<ZoneLootTable>,
    pub drop_tables: Vec<DropTable>,
}
