//! Loot table roller
//!
//! Turns a loot table into a rolled item instance: base item, rarity,
//! scalar, then affixes drawn from the item's compatible pool.

use std::collections::HashSet;

use rand::Rng;

use super::table::LootTable;
use super::tuning::{LootTier, RarityWeights, ZoneLootTuning};
use super::weighted::{roll_int_range, roll_range, roll_weighted};
use crate::data::LootRegistry;
use crate::error::{LootError, LootResult};
use crate::items::{
    fixed_affix_count, AffixDefinition, AffixRoll, AffixTag, ItemDefinition, ItemInstance,
    RarityDefinition,
};

/// Number of affixes to roll for a rarity
pub fn affix_count(rarity: &RarityDefinition, rng: &mut impl Rng) -> u32 {
    if let Some(count) = fixed_affix_count(&rarity.id) {
        return count;
    }
    let (min, max) = rarity.affix_range();
    roll_int_range(min, max, rng)
}

/// Name of the zone pool for an item, picked by its first matching tag
fn zone_pool_id(zone: &str, item: &ItemDefinition) -> Option<String> {
    let suffix = if item.has_tag(AffixTag::WeaponMelee) {
        "WeaponAffixes_Melee"
    } else if item.has_tag(AffixTag::WeaponRanged) {
        "WeaponAffixes_Ranged"
    } else if item.has_tag(AffixTag::WeaponMagic) {
        "WeaponAffixes_Magic"
    } else if item.has_tag(AffixTag::Armor) {
        "ArmorAffixes"
    } else if item.has_tag(AffixTag::Jewelry) {
        "JewelryAffixes"
    } else {
        return None;
    };
    Some(format!("{}_{}", zone, suffix))
}

/// Affixes that may roll on `item`.
///
/// Source priority: table override, zone pool, whole registry. Every source is
/// filtered by weight, allowed slot and tag intersection.
pub fn eligible_affix_pool<'a>(
    registry: &'a LootRegistry,
    item: &ItemDefinition,
    table: Option<&LootTable>,
) -> Vec<&'a AffixDefinition> {
    let mut source: Option<Vec<&'a AffixDefinition>> = None;

    if let Some(table) = table {
        if !table.affix_pool_override.is_empty() {
            source = Some(registry.resolve_affixes(&table.affix_pool_override));
        } else if let Some(zone) = table.zone_prefix() {
            let pool = zone_pool_id(zone, item).and_then(|id| registry.affix_pool(&id));
            if let Some(pool) = pool.filter(|p| !p.affixes.is_empty()) {
                log::debug!("Using zone affix pool '{}' for {}", pool.id, item.id);
                source = Some(registry.resolve_affixes(&pool.affixes));
            }
        }
    }

    let source = source.unwrap_or_else(|| registry.affixes().collect());
    source.into_iter().filter(|a| a.is_eligible_for(item)).collect()
}

/// Build an instance and roll its affixes
fn roll_instance(
    registry: &LootRegistry,
    item: &ItemDefinition,
    rarity: &RarityDefinition,
    item_level: u32,
    table: Option<&LootTable>,
    rng: &mut impl Rng,
) -> ItemInstance {
    let (scalar_min, scalar_max) = rarity.scalar_range();
    let scalar = roll_range(scalar_min, scalar_max, rng);
    let count = affix_count(rarity, rng);

    let mut inst = ItemInstance::new(item.id.clone(), rarity.id.clone(), item_level);
    inst.base_scalar = scalar;

    if count == 0 {
        return inst;
    }

    let pool = eligible_affix_pool(registry, item, table);
    let mut used_stats = HashSet::new();
    for _ in 0..count {
        let picked = roll_weighted(
            &pool,
            |a| if used_stats.contains(&a.stat) { 0.0 } else { a.weight as f32 },
            rng,
        );
        let Some(affix) = picked else {
            break;
        };
        used_stats.insert(affix.stat);

        let (min, max) = affix.roll_range(inst.item_level);
        inst.affixes.push(AffixRoll {
            affix_id: affix.id.clone(),
            value: roll_range(min, max, rng),
        });
    }

    inst
}

/// Roll one item from a table.
///
/// With `rarity_weights` the table's rarities are reweighted by id; when that
/// leaves nothing rollable the table's own weights are used. Entries whose ids
/// do not resolve never win. Returns `None` when no item or rarity can be picked.
pub fn roll_item(
    registry: &LootRegistry,
    table: &LootTable,
    item_level: u32,
    rarity_weights: Option<&RarityWeights>,
    rng: &mut impl Rng,
) -> Option<ItemInstance> {
    let picked = roll_weighted(
        &table.items,
        |e| if registry.item(&e.item).is_some() { e.weight } else { 0.0 },
        rng,
    )?;
    let item = registry.item(&picked.item)?;

    let by_table = |e: &super::table::WeightedRarity| {
        if registry.rarity(&e.rarity).is_some() { e.weight } else { 0.0 }
    };
    let rarity_entry = match rarity_weights {
        Some(weights) => roll_weighted(
            &table.rarities,
            |e| if registry.rarity(&e.rarity).is_some() { weights.weight(&e.rarity) } else { 0.0 },
            rng,
        )
        .or_else(|| roll_weighted(&table.rarities, by_table, rng)),
        None => roll_weighted(&table.rarities, by_table, rng),
    }?;
    let rarity = registry.rarity(&rarity_entry.rarity)?;

    let inst = roll_instance(registry, item, rarity, item_level, Some(table), rng);
    log::debug!(
        "Created {} rarity={} ilvl={} affixes={}",
        item.name(),
        inst.rarity_id,
        inst.item_level,
        inst.affixes.len()
    );
    Some(inst)
}

/// Roll a specific item at a specific rarity, drawing affixes from the whole registry
pub fn roll_specific(
    registry: &LootRegistry,
    item_id: &str,
    rarity_id: &str,
    item_level: u32,
    rng: &mut impl Rng,
) -> LootResult<ItemInstance> {
    let item = registry
        .item(item_id)
        .ok_or_else(|| LootError::UnknownItem(item_id.to_string()))?;
    let rarity = registry
        .rarity(rarity_id)
        .ok_or_else(|| LootError::UnknownRarity(rarity_id.to_string()))?;
    Ok(roll_instance(registry, item, rarity, item_level, None, rng))
}

/// Roll with a zone's tuned item level and rarity weights for a tier.
/// Without tuning this is a plain roll at item level 1.
pub fn roll_item_with_zone_tuning(
    registry: &LootRegistry,
    table: &LootTable,
    tuning: Option<&ZoneLootTuning>,
    tier: LootTier,
    rng: &mut impl Rng,
) -> Option<ItemInstance> {
    let Some(tuning) = tuning else {
        return roll_item(registry, table, 1, None, rng);
    };
    let item_level = tuning.item_level(tier).roll(rng);
    let weights = tuning.weights(tier);
    roll_item(registry, table, item_level, Some(&weights), rng)
}
