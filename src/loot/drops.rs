//! Enemy death drops
//!
//! Combines zone tuning, threat scaling, loot tier scaling, bonus rolls,
//! tier buckets and set pieces into the full set of drops for one kill.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::roller::roll_item;
use super::set_drops::{roll_set_drops, SetDropPity};
use super::tuning::{clamp_loot_tier, LootTier};
use super::weighted::chance;
use crate::data::LootRegistry;
use crate::error::{LootError, LootResult};
use crate::items::ItemInstance;

/// Extra bucket rolls granted by enemy label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropBonusConfig {
    pub elite_bonus_rolls: u32,
    pub boss_bonus_rolls: u32,
}

impl Default for DropBonusConfig {
    fn default() -> Self {
        Self { elite_bonus_rolls: 1, boss_bonus_rolls: 2 }
    }
}

impl DropBonusConfig {
    pub fn extra_rolls(&self, label: LootTier) -> u32 {
        match label {
            LootTier::Trash => 0,
            LootTier::Elite => self.elite_bonus_rolls,
            LootTier::Boss => self.boss_bonus_rolls,
        }
    }
}

/// Everything known about the enemy that died
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDropContext {
    pub table_id: String,
    /// Level for tables without zone tuning
    pub item_level: u32,
    /// Wins over every other source of item level
    pub item_level_override: Option<u32>,
    pub threat: f32,
    /// Authored loot tier, clamped when used
    pub loot_tier: i32,
    pub label: LootTier,
}

impl EnemyDropContext {
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            item_level: 1,
            item_level_override: None,
            threat: 0.0,
            loot_tier: 1,
            label: LootTier::Trash,
        }
    }
}

/// Drops for one kill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDrops {
    pub main: ItemInstance,
    pub extra: Vec<ItemInstance>,
}

impl EnemyDrops {
    pub fn all(&self) -> impl Iterator<Item = &ItemInstance> {
        std::iter::once(&self.main).chain(self.extra.iter())
    }

    pub fn count(&self) -> usize {
        1 + self.extra.len()
    }
}

/// Roll the drops for an enemy death, with fresh set drop pity
pub fn roll_enemy_drops(
    registry: &LootRegistry,
    ctx: &EnemyDropContext,
    rng: &mut impl Rng,
) -> LootResult<EnemyDrops> {
    roll_enemy_drops_with_pity(registry, ctx, &mut SetDropPity::new(), rng)
}

/// Roll the drops for an enemy death, carrying boss set pity across kills
pub fn roll_enemy_drops_with_pity(
    registry: &LootRegistry,
    ctx: &EnemyDropContext,
    pity: &mut SetDropPity,
    rng: &mut impl Rng,
) -> LootResult<EnemyDrops> {
    let table = registry
        .table(&ctx.table_id)
        .ok_or_else(|| LootError::UnknownTable(ctx.table_id.clone()))?;
    let loot_tier = clamp_loot_tier(ctx.loot_tier);
    let mut item_level = ctx.item_level_override.unwrap_or(ctx.item_level).max(1);
    let mut extra = Vec::new();

    let main = match registry.zone_tuning_for(&table.id) {
        Some(tuning) => {
            let tier = LootTier::from_table_id(&table.id);
            if ctx.item_level_override.is_none() {
                item_level = tuning.item_level(tier).roll(rng);
            }

            let mut weights = tuning.weights(tier);
            let bonus = registry
                .threat_scaling()
                .map(|s| s.apply(ctx.threat, &mut weights))
                .unwrap_or_default();
            weights.apply_loot_tier(loot_tier);

            let main = roll_item(registry, table, item_level, Some(&weights), rng)
                .ok_or_else(|| LootError::NothingToRoll(table.id.clone()))?;
            log::debug!(
                "Loot tier {} weights common={:.3} uncommon={:.3} rare={:.3} epic={:.3} chose {}",
                loot_tier,
                weights.common,
                weights.uncommon,
                weights.rare,
                weights.epic,
                main.rarity_id
            );

            if bonus.bonus_roll_chance > 0.0 {
                for _ in 0..bonus.bonus_rolls {
                    if !chance(bonus.bonus_roll_chance, rng) {
                        continue;
                    }
                    if let Some(inst) = roll_item(registry, table, item_level, Some(&weights), rng) {
                        extra.push(inst);
                    }
                }
            }
            main
        }
        None => roll_item(registry, table, item_level, None, rng)
            .ok_or_else(|| LootError::NothingToRoll(table.id.clone()))?,
    };

    if let Some(buckets) = registry.tier_loot() {
        let rolls = 1 + registry.drop_bonus().extra_rolls(ctx.label);
        for _ in 0..rolls {
            extra.extend(buckets.roll(loot_tier, item_level, rng));
        }
    }

    extra.extend(roll_set_drops(registry, table, &main.rarity_id, item_level, pity, rng));

    log::debug!(
        "Enemy drop from '{}' ({}): {} rarity={} ilvl={} extra={}",
        table.id,
        ctx.label,
        main.base_item_id,
        main.rarity_id,
        main.item_level,
        extra.len()
    );

    Ok(EnemyDrops { main, extra })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::buckets::{BucketEntry, TierLootBucket, TierLootConfig};
    use crate::loot::set_drops::{BossPityConfig, SetDropConfig, SetDropTier};
    use crate::loot::threat::{ThreatLootScaling, ThreatLootTier};
    use crate::data::defaults::starter_registry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unknown_table() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(1);
        let err = roll_enemy_drops(&registry, &EnemyDropContext::new("Nope"), &mut rng).unwrap_err();
        assert!(matches!(err, LootError::UnknownTable(_)));
    }

    #[test]
    fn test_plain_table_uses_context_level() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(2);
        let mut ctx = EnemyDropContext::new("Starter");
        ctx.item_level = 7;
        let drops = roll_enemy_drops(&registry, &ctx, &mut rng).unwrap();
        assert_eq!(drops.main.item_level, 7);
    }

    #[test]
    fn test_zone_table_uses_tuned_level_unless_overridden() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(3);
        let mut ctx = EnemyDropContext::new("Zone1_Elite");
        ctx.item_level = 50;
        for _ in 0..20 {
            let drops = roll_enemy_drops(&registry, &ctx, &mut rng).unwrap();
            assert!((4..=8).contains(&drops.main.item_level));
        }

        ctx.item_level_override = Some(30);
        let drops = roll_enemy_drops(&registry, &ctx, &mut rng).unwrap();
        assert_eq!(drops.main.item_level, 30);
    }

    #[test]
    fn test_bucket_rolls_per_label() {
        let mut registry = starter_registry();
        registry.set_tier_loot(TierLootConfig {
            buckets: vec![TierLootBucket { tier: 1, entries: vec![BucketEntry::new("Starter_Sword", 1, 1, 1)] }],
        });
        registry.set_threat_scaling(None);
        let mut rng = StdRng::seed_from_u64(4);

        let mut ctx = EnemyDropContext::new("Starter");
        assert_eq!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().extra.len(), 1);
        ctx.label = LootTier::Elite;
        assert_eq!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().extra.len(), 2);
        ctx.label = LootTier::Boss;
        assert_eq!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().count(), 4);
    }

    #[test]
    fn test_threat_bonus_rolls() {
        let mut registry = starter_registry();
        let mut tier = ThreatLootTier::neutral(1.0);
        tier.bonus_rolls = 2;
        tier.bonus_roll_chance = 1.0;
        registry.set_threat_scaling(Some(ThreatLootScaling { tiers: vec![tier] }));
        registry.set_tier_loot(TierLootConfig::default());
        registry.set_set_drops(Vec::new());
        let mut rng = StdRng::seed_from_u64(5);

        let mut ctx = EnemyDropContext::new("Zone1_Trash");
        ctx.threat = 0.5;
        assert_eq!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().extra.len(), 0);
        ctx.threat = 3.0;
        assert_eq!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().extra.len(), 2);
    }

    #[test]
    fn test_set_pieces_use_main_rarity() {
        let mut registry = starter_registry();
        registry.set_tier_loot(TierLootConfig::default());
        registry.set_threat_scaling(None);
        registry.set_set_drops(vec![SetDropConfig {
            set_id: "AbyssalInitiate".into(),
            zone: "Zone1".into(),
            pieces: vec!["Initiate_Hood".into()],
            elite: SetDropTier::new(100.0, 2),
            ..SetDropConfig::default()
        }]);
        let mut rng = StdRng::seed_from_u64(6);

        let drops = roll_enemy_drops(&registry, &EnemyDropContext::new("Zone1_Elite"), &mut rng).unwrap();
        assert_eq!(drops.extra.len(), 2);
        for piece in &drops.extra {
            assert_eq!(piece.base_item_id, "Initiate_Hood");
            assert_eq!(piece.rarity_id, drops.main.rarity_id);
            assert_eq!(piece.item_level, drops.main.item_level);
        }

        // Trash chance is zero
        let drops = roll_enemy_drops(&registry, &EnemyDropContext::new("Zone1_Trash"), &mut rng).unwrap();
        assert!(drops.extra.is_empty());
    }

    #[test]
    fn test_boss_pity_carries_across_kills() {
        let mut registry = starter_registry();
        registry.set_tier_loot(TierLootConfig::default());
        registry.set_threat_scaling(None);
        registry.set_set_drops(vec![SetDropConfig {
            set_id: "AbyssalInitiate".into(),
            zone: "Zone1".into(),
            pieces: vec!["Initiate_Robe".into()],
            boss: SetDropTier::new(0.0, 4),
            boss_pity: BossPityConfig { enabled: true, threshold_kills: 4, guarantee_one_piece: true },
            ..SetDropConfig::default()
        }]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut pity = SetDropPity::new();
        let ctx = EnemyDropContext::new("Zone1_Boss");

        let extras: Vec<usize> = (0..8)
            .map(|_| roll_enemy_drops_with_pity(&registry, &ctx, &mut pity, &mut rng).unwrap().extra.len())
            .collect();
        assert_eq!(extras, vec![0, 0, 0, 1, 0, 0, 0, 1]);

        // Without carried state the counter never builds up
        for _ in 0..8 {
            assert!(roll_enemy_drops(&registry, &ctx, &mut rng).unwrap().extra.is_empty());
        }
    }

    #[test]
    fn test_extra_rolls_config() {
        let cfg = DropBonusConfig::default();
        assert_eq!(cfg.extra_rolls(LootTier::Trash), 0);
        assert_eq!(cfg.extra_rolls(LootTier::Elite), 1);
        assert_eq!(cfg.extra_rolls(LootTier::Boss), 2);
    }
}
