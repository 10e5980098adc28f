//! Integration test: content files -> registry -> rolls -> enemy drops
//!
//! Exercises the public API the way the CLI does: export the starter content,
//! load it back from disk, then roll tables and enemy deaths against it.

use std::collections::HashSet;
use std::fs;

use abyssloot::data::{export_default_data, starter_registry, validate, DataManager};
use abyssloot::items::fixed_affix_count;
use abyssloot::loot::{
    eligible_affix_pool, roll_enemy_drops, roll_enemy_drops_with_pity, roll_item, roll_specific, EnemyDropContext,
    LootTier, SetDropPity,
};
use abyssloot::LootError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

// =========================================================================
// Content on disk
// =========================================================================

#[test]
fn test_exported_content_rolls_like_builtin() {
    let dir = TempDir::new().unwrap();
    export_default_data(dir.path()).unwrap();

    let from_disk = DataManager::load(dir.path()).into_registry();
    let builtin = starter_registry();

    for table_id in ["Starter", "Zone1_Trash", "Zone1_Elite", "Zone1_Boss"] {
        let a = roll_item(&from_disk, from_disk.table(table_id).unwrap(), 5, None, &mut StdRng::seed_from_u64(99));
        let b = roll_item(&builtin, builtin.table(table_id).unwrap(), 5, None, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b, "table {table_id} should roll identically from disk");
    }
}

#[test]
fn test_edited_table_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    export_default_data(dir.path()).unwrap();
    fs::write(
        dir.path().join("tables.ron"),
        r#"[(id: "OnlyBows", items: [(item: "Starter_Bow", weight: 1.0)], rarities: [(rarity: "Rare", weight: 1.0)])]"#,
    )
    .unwrap();

    let manager = DataManager::load(dir.path());
    assert!(validate(manager.content()).is_empty());

    let registry = manager.into_registry();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let inst = roll_item(&registry, registry.table("onlybows").unwrap(), 3, None, &mut rng).unwrap();
        assert_eq!(inst.base_item_id, "Starter_Bow");
        assert_eq!(inst.rarity_id, "Rare");
    }
}

#[test]
fn test_dangling_content_still_rolls_and_validates_dirty() {
    let dir = TempDir::new().unwrap();
    export_default_data(dir.path()).unwrap();
    fs::write(
        dir.path().join("tables.ron"),
        r#"[(id: "Mixed", items: [(item: "Ghost", weight: 100.0), (item: "Starter_Sword", weight: 1.0)], rarities: [(rarity: "Common", weight: 1.0)])]"#,
    )
    .unwrap();

    let manager = DataManager::load(dir.path());
    let issues = validate(manager.content());
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("Ghost"));

    // Unresolvable entries never win, whatever their weight
    let registry = manager.into_registry();
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..20 {
        let inst = roll_item(&registry, registry.table("Mixed").unwrap(), 1, None, &mut rng).unwrap();
        assert_eq!(inst.base_item_id, "Starter_Sword");
    }
}

// =========================================================================
// Rolled instance invariants
// =========================================================================

#[test]
fn test_rolled_affixes_respect_rarity_and_pool() {
    let registry = starter_registry();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..500 {
        let inst = roll_item(&registry, registry.table("Zone1_Boss").unwrap(), 10, None, &mut rng).unwrap();
        let item = registry.item(&inst.base_item_id).unwrap();
        let rarity = registry.rarity(&inst.rarity_id).unwrap();

        let expected = fixed_affix_count(&rarity.id).unwrap();
        assert!(inst.affixes.len() as u32 <= expected);

        let (smin, smax) = rarity.scalar_range();
        assert!(inst.base_scalar >= smin && inst.base_scalar <= smax);

        let pool: HashSet<String> = eligible_affix_pool(&registry, item, registry.table("Zone1_Boss"))
            .iter()
            .map(|a| a.id.clone())
            .collect();
        let mut stats = HashSet::new();
        for roll in &inst.affixes {
            assert!(pool.contains(&roll.affix_id), "{} not eligible for {}", roll.affix_id, item.id);
            let affix = registry.affix(&roll.affix_id).unwrap();
            assert!(stats.insert(affix.stat), "duplicate stat {:?} on {}", affix.stat, item.id);
            let (min, max) = affix.roll_range(inst.item_level);
            assert!(roll.value >= min && roll.value <= max);
        }
    }
}

#[test]
fn test_roll_specific_errors() {
    let registry = starter_registry();
    let mut rng = StdRng::seed_from_u64(1);

    let inst = roll_specific(&registry, "starter_sword", "LEGENDARY", 12, &mut rng).unwrap();
    assert_eq!(inst.affixes.len(), 4);

    assert!(matches!(
        roll_specific(&registry, "Nope", "Common", 1, &mut rng),
        Err(LootError::UnknownItem(_))
    ));
    assert!(matches!(
        roll_specific(&registry, "Starter_Sword", "Shiny", 1, &mut rng),
        Err(LootError::UnknownRarity(_))
    ));
}

// =========================================================================
// Enemy deaths
// =========================================================================

#[test]
fn test_enemy_drop_bucket_rolls_by_label() {
    let mut registry = starter_registry();
    registry.set_set_drops(Vec::new());
    let mut rng = StdRng::seed_from_u64(77);

    let mut trash = EnemyDropContext::new("Zone1_Trash");
    trash.label = LootTier::Trash;
    let drops = roll_enemy_drops(&registry, &trash, &mut rng).unwrap();
    assert!((1..=2).contains(&drops.extra.len()));
    assert!(drops.extra.iter().all(|i| i.base_item_id == "Iron_Scrap"));

    // Boss: one bucket roll plus two bonus rolls, each at least one item
    let mut boss = EnemyDropContext::new("Zone1_Boss");
    boss.label = LootTier::Boss;
    let drops = roll_enemy_drops(&registry, &boss, &mut rng).unwrap();
    assert!(drops.extra.len() >= 3);
    assert!((8..=12).contains(&drops.main.item_level));
}

#[test]
fn test_boss_set_pity_bounds_dry_streaks() {
    let registry = starter_registry();
    let mut rng = StdRng::seed_from_u64(404);
    let mut pity = SetDropPity::new();
    let mut boss = EnemyDropContext::new("Zone1_Boss");
    boss.label = LootTier::Boss;

    let mut resets = 0;
    let mut last = 0;
    for _ in 0..300 {
        roll_enemy_drops_with_pity(&registry, &boss, &mut pity, &mut rng).unwrap();
        let kills = pity.kills_since_drop("AbyssalInitiate");
        assert!(kills < 10, "pity counter reached {kills}");
        if kills == 0 {
            resets += 1;
        } else {
            assert_eq!(kills, last + 1);
        }
        last = kills;
    }
    // At least one piece every ten kills
    assert!(resets >= 30);
}

#[test]
fn test_high_threat_and_tier_shift_rarity_up() {
    let registry = starter_registry();
    let rare_or_better = |threat: f32, loot_tier: i32, seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = EnemyDropContext::new("Zone1_Trash");
        ctx.threat = threat;
        ctx.loot_tier = loot_tier;
        (0..2000)
            .filter(|_| {
                let drops = roll_enemy_drops(&registry, &ctx, &mut rng).unwrap();
                let order = registry.rarity(&drops.main.rarity_id).unwrap().sort_order;
                order >= 3
            })
            .count()
    };

    let baseline = rare_or_better(0.0, 1, 10);
    let boosted = rare_or_better(5.0, 5, 10);
    assert!(boosted > baseline, "baseline {baseline} boosted {boosted}");
}
