//! Set piece drops
//!
//! Zone tables can add pieces of an item set on top of the regular drops.
//! Each enemy tier has its own chance, and bosses can carry a pity counter
//! that forces a piece after a run of empty kills.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::roller::roll_specific;
use super::table::LootTable;
use super::tuning::LootTier;
use super::weighted::{chance, pick_index};
use crate::data::{normalize_id, LootRegistry};
use crate::items::ItemInstance;

const FALLBACK_RARITY: &str = "Common";

/// Chance and roll count for one enemy tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetDropTier {
    /// Percent, 0 to 100
    pub chance_percent: f32,
    #[serde(default = "default_pieces")]
    pub pieces_on_hit: u32,
}

fn default_pieces() -> u32 {
    1
}

impl SetDropTier {
    pub fn new(chance_percent: f32, pieces_on_hit: u32) -> Self {
        Self { chance_percent, pieces_on_hit }
    }

    pub fn chance01(&self) -> f32 {
        (self.chance_percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn pieces(&self) -> u32 {
        self.pieces_on_hit.max(1)
    }
}

impl Default for SetDropTier {
    fn default() -> Self {
        Self::new(0.0, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossPityConfig {
    pub enabled: bool,
    pub threshold_kills: u32,
    /// Force a single piece once the threshold is reached
    pub guarantee_one_piece: bool,
}

impl Default for BossPityConfig {
    fn default() -> Self {
        Self { enabled: false, threshold_kills: 10, guarantee_one_piece: true }
    }
}

impl BossPityConfig {
    pub fn threshold(&self) -> u32 {
        self.threshold_kills.max(1)
    }
}

/// Set pieces that can drop from one zone's tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetDropConfig {
    pub set_id: String,
    /// Zone prefix of the tables this applies to, e.g. `Zone1`
    pub zone: String,
    pub pieces: Vec<String>,
    pub trash: SetDropTier,
    pub elite: SetDropTier,
    pub boss: SetDropTier,
    pub boss_pity: BossPityConfig,
}

impl SetDropConfig {
    pub fn tier(&self, tier: LootTier) -> &SetDropTier {
        match tier {
            LootTier::Trash => &self.trash,
            LootTier::Elite => &self.elite,
            LootTier::Boss => &self.boss,
        }
    }

    /// Whether tables of `table` roll this config
    pub fn applies_to(&self, table: &LootTable) -> bool {
        let zone = self.zone.trim();
        !zone.is_empty() && table.zone_prefix().is_some_and(|p| p.eq_ignore_ascii_case(zone))
    }

    fn pity_key(&self) -> String {
        normalize_id(&self.set_id)
    }
}

/// Boss kills since the last set piece, per set id. Owned by the caller so
/// a session can carry it between kills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDropPity {
    kills_since_drop: HashMap<String, u32>,
}

impl SetDropPity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kills_since_drop(&self, set_id: &str) -> u32 {
        self.kills_since_drop.get(&normalize_id(set_id)).copied().unwrap_or(0)
    }

    fn record_kill(&mut self, key: &str) -> u32 {
        let kills = self.kills_since_drop.entry(key.to_string()).or_insert(0);
        *kills += 1;
        *kills
    }

    fn reset(&mut self, key: &str) {
        self.kills_since_drop.insert(key.to_string(), 0);
    }
}

/// Roll every set config that applies to `table`. Pieces use the rarity of
/// the main drop, falling back to Common when it is unknown.
pub fn roll_set_drops(
    registry: &LootRegistry,
    table: &LootTable,
    rarity_id: &str,
    item_level: u32,
    pity: &mut SetDropPity,
    rng: &mut impl Rng,
) -> Vec<ItemInstance> {
    let mut drops = Vec::new();
    for config in registry.set_drops().filter(|c| c.applies_to(table)) {
        drops.extend(roll_config(registry, config, table, rarity_id, item_level, pity, rng));
    }
    drops
}

fn roll_config(
    registry: &LootRegistry,
    config: &SetDropConfig,
    table: &LootTable,
    rarity_id: &str,
    item_level: u32,
    pity: &mut SetDropPity,
    rng: &mut impl Rng,
) -> Vec<ItemInstance> {
    let pieces: Vec<&str> = config
        .pieces
        .iter()
        .map(|p| p.as_str())
        .filter(|p| registry.item(p).is_some())
        .collect();
    if pieces.is_empty() {
        return Vec::new();
    }

    let tier = LootTier::from_table_id(&table.id);
    let settings = config.tier(tier);
    let mut rolls = settings.pieces();

    let key = config.pity_key();
    let pity_active = tier == LootTier::Boss && config.boss_pity.enabled;
    let kills = if pity_active { pity.record_kill(&key) } else { 0 };

    let mut hit = chance(settings.chance01(), rng);
    let mut forced = false;
    if !hit && pity_active && config.boss_pity.guarantee_one_piece && kills >= config.boss_pity.threshold() {
        hit = true;
        forced = true;
        rolls = 1;
    }
    if !hit {
        return Vec::new();
    }

    let rarity = if registry.rarity(rarity_id).is_some() { rarity_id } else { FALLBACK_RARITY };
    let level = item_level.max(1);
    let mut drops = Vec::with_capacity(rolls as usize);
    for _ in 0..rolls {
        let piece = pieces[pick_index(pieces.len(), rng)];
        match roll_specific(registry, piece, rarity, level, rng) {
            Ok(inst) => drops.push(inst),
            Err(e) => log::warn!("Set drop '{}' skipped piece {}: {}", config.set_id, piece, e),
        }
    }

    if pity_active {
        pity.reset(&key);
        if forced {
            log::info!(
                "Set drop pity triggered for '{}' after {} kills",
                config.set_id,
                config.boss_pity.threshold()
            );
        }
    }
    log::debug!("Set drop '{}' from '{}': {} piece(s)", config.set_id, table.id, drops.len());
    drops
}
