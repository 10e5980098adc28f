//! Built-in starter content
//!
//! Used when data files are missing and as the template written by
//! `export-defaults`.

use super::content::{LootContent, ThreatSettings};
use super::registry::LootRegistry;
use crate::items::{
    AffixDefinition, AffixPool, AffixTag, EquipSlot, ItemDefinition, ItemSetDefinition, RarityDefinition,
    SetBonusTier, StatMod, StatType,
};
use crate::loot::{
    BossPityConfig, BucketEntry, DropBonusConfig, DropEntry, DropTable, GuaranteedDropRule, ItemCategory,
    ItemLevelRange, ItemRarity, LootTable, RarityWeights, SetDropConfig, SetDropTier, ThreatDistanceConfig,
    ThreatLootScaling, ThreatLootTier, TierLootBucket, TierLootConfig, ZoneLootTable, ZoneLootTuning,
    ZonePoolEntry,
};

/// Registry built from the starter content
pub fn starter_registry() -> LootRegistry {
    LootRegistry::from_content(starter_content())
}

pub fn starter_content() -> LootContent {
    LootContent {
        items: default_items(),
        rarities: default_rarities(),
        affixes: default_affixes(),
        affix_pools: default_affix_pools(),
        tables: default_tables(),
        sets: default_sets(),
        zone_tunings: vec![zone1_tuning()],
        threat: ThreatSettings {
            distance: ThreatDistanceConfig::default(),
            scaling: Some(default_threat_scaling()),
        },
        tier_loot: Some(default_tier_loot()),
        drop_bonus: DropBonusConfig::default(),
        set_drops: vec![zone1_set_drops()],
        zone_tables: vec![zone1_zone_table()],
        drop_tables: vec![zone1_legacy_drop_table()],
    }
}

pub fn default_rarities() -> Vec<RarityDefinition> {
    let special = |mut r: RarityDefinition| {
        r.enabled = false;
        r.special = true;
        r
    };

    vec![
        RarityDefinition::new("Common", 0).with_affixes(0, 0).with_scalar(1.0, 1.0),
        RarityDefinition::new("Uncommon", 1).with_affixes(0, 1).with_scalar(1.0, 1.05),
        RarityDefinition::new("Magic", 2).with_affixes(1, 2).with_scalar(1.05, 1.15),
        RarityDefinition::new("Rare", 3).with_affixes(2, 3).with_scalar(1.1, 1.25),
        RarityDefinition::new("Epic", 4).with_affixes(3, 4).with_scalar(1.2, 1.4),
        RarityDefinition::new("Legendary", 5).with_affixes(4, 5).with_scalar(1.35, 1.6),
        special(RarityDefinition::new("Set", 6).with_affixes(4, 6).with_scalar(1.4, 1.7)),
        special(RarityDefinition::new("Unique", 7).with_affixes(4, 6).with_scalar(1.5, 1.8)),
        special(RarityDefinition::new("Mythic", 8).with_affixes(5, 7).with_scalar(1.6, 2.0)),
        special(RarityDefinition::new("Radiant", 9).with_affixes(5, 7).with_scalar(1.7, 2.2)),
    ]
}

pub fn default_affixes() -> Vec<AffixDefinition> {
    use AffixTag::*;

    let mut swiftness = AffixDefinition::new("Swiftness", "of Swiftness", StatType::MoveSpeed, 0.1, 0.35)
        .with_tags(&[Armor, Jewelry]);
    swiftness.percent = true;
    let mut fury = AffixDefinition::new("Fury", "of Fury", StatType::AttackSpeed, 0.1, 0.35)
        .with_tags(&[WeaponMelee, WeaponRanged, WeaponMagic]);
    fury.percent = true;

    vec![
        AffixDefinition::new("Power", "of Power", StatType::MeleeDamage, 1.0, 4.0).with_tags(&[WeaponMelee]),
        AffixDefinition::new("Precision", "of Precision", StatType::RangedDamage, 1.0, 4.0)
            .with_tags(&[WeaponRanged]),
        AffixDefinition::new("Sorcery", "of Sorcery", StatType::MagicDamage, 1.0, 4.0).with_tags(&[WeaponMagic]),
        AffixDefinition::new("Fortitude", "of Fortitude", StatType::MaxHealth, 5.0, 20.0)
            .with_tags(&[Armor, Jewelry]),
        AffixDefinition::new("Bulwark", "of Bulwark", StatType::Defense, 1.0, 4.0).with_tags(&[Armor]),
        swiftness,
        fury,
        AffixDefinition::new("Strength", "of Strength", StatType::Strength, 1.0, 3.0).with_tags(&[Any]),
        AffixDefinition::new("AttackSkill", "of the Duelist", StatType::Attack, 1.0, 3.0).with_tags(&[WeaponMelee]),
        AffixDefinition::new("MagicSkill", "of the Arcanist", StatType::MagicSkill, 1.0, 3.0)
            .with_tags(&[WeaponMagic]),
    ]
}

pub fn default_items() -> Vec<ItemDefinition> {
    use AffixTag::*;

    let set_piece = |mut item: ItemDefinition| {
        item.set_id = Some("AbyssalInitiate".to_string());
        item
    };
    let material = |id: &str, name: &str| {
        let mut item = ItemDefinition::new(id, name, EquipSlot::None);
        item.stackable = true;
        item
    };

    vec![
        ItemDefinition::new("Starter_Sword", "Rusty Sword", EquipSlot::RightHand)
            .with_stat(StatMod::flat(StatType::MeleeDamage, 2.0))
            .with_tags(&[WeaponMelee]),
        ItemDefinition::new("Starter_Bow", "Simple Bow", EquipSlot::RightHand)
            .with_stat(StatMod::flat(StatType::RangedDamage, 2.0))
            .with_tags(&[WeaponRanged]),
        ItemDefinition::new("QA_Greatsword_2H", "Greatsword", EquipSlot::RightHand)
            .with_stat(StatMod::flat(StatType::MeleeDamage, 4.0))
            .with_tags(&[WeaponMelee])
            .two_handed(),
        ItemDefinition::new("QA_Longbow_2H", "Longbow", EquipSlot::RightHand)
            .with_stat(StatMod::flat(StatType::RangedDamage, 4.0))
            .with_tags(&[WeaponRanged])
            .two_handed(),
        ItemDefinition::new("QA_Staff_2H", "Staff", EquipSlot::RightHand)
            .with_stat(StatMod::flat(StatType::MagicDamage, 4.0))
            .with_tags(&[WeaponMagic])
            .two_handed(),
        ItemDefinition::new("Starter_Chest", "Worn Chestpiece", EquipSlot::Chest)
            .with_stat(StatMod::flat(StatType::Defense, 1.0))
            .with_stat(StatMod::flat(StatType::MaxHealth, 5.0))
            .with_tags(&[Armor]),
        set_piece(
            ItemDefinition::new("Initiate_Hood", "Initiate's Hood", EquipSlot::Helm)
                .with_stat(StatMod::flat(StatType::Defense, 1.0))
                .with_tags(&[Armor]),
        ),
        set_piece(
            ItemDefinition::new("Initiate_Robe", "Initiate's Robe", EquipSlot::Chest)
                .with_stat(StatMod::flat(StatType::Defense, 2.0))
                .with_tags(&[Armor]),
        ),
        set_piece(
            ItemDefinition::new("Initiate_Leggings", "Initiate's Leggings", EquipSlot::Legs)
                .with_stat(StatMod::flat(StatType::Defense, 1.0))
                .with_stat(StatMod::flat(StatType::MaxHealth, 5.0))
                .with_tags(&[Armor]),
        ),
        material("Iron_Scrap", "Iron Scrap"),
        material("Abyssal_Shard", "Abyssal Shard"),
        material("Abyss_Core", "Abyss Core"),
    ]
}

pub fn default_sets() -> Vec<ItemSetDefinition> {
    vec![ItemSetDefinition {
        set_id: "AbyssalInitiate".into(),
        display_name: "Abyssal Initiate".into(),
        pieces: vec!["Initiate_Hood".into(), "Initiate_Robe".into(), "Initiate_Leggings".into()],
        bonuses: vec![
            SetBonusTier {
                required_pieces: 2,
                description: "+10 Max Health".into(),
                modifiers: vec![StatMod::flat(StatType::MaxHealth, 10.0)],
            },
            SetBonusTier {
                required_pieces: 3,
                description: "+2 Defense, +1 Magic Skill".into(),
                modifiers: vec![
                    StatMod::flat(StatType::Defense, 2.0),
                    StatMod::flat(StatType::MagicSkill, 1.0),
                ],
            },
        ],
    }]
}

pub fn default_affix_pools() -> Vec<AffixPool> {
    let pool = |id: &str, affixes: &[&str]| AffixPool {
        id: id.to_string(),
        affixes: affixes.iter().map(|s| s.to_string()).collect(),
    };

    vec![
        pool("Zone1_WeaponAffixes_Melee", &["Power", "Fury", "Strength", "AttackSkill"]),
        pool("Zone1_WeaponAffixes_Ranged", &["Precision", "Fury", "Strength"]),
        pool("Zone1_WeaponAffixes_Magic", &["Sorcery", "Fury", "Strength", "MagicSkill"]),
        pool("Zone1_ArmorAffixes", &["Fortitude", "Bulwark", "Swiftness"]),
        pool("Zone1_JewelryAffixes", &["Fortitude", "Swiftness", "Strength"]),
    ]
}

fn with_weights(mut table: LootTable, weights: &RarityWeights) -> LootTable {
    for id in ["Common", "Uncommon", "Magic", "Rare", "Epic", "Legendary"] {
        table = table.with_rarity(id, weights.weight(id));
    }
    table
}

pub fn default_tables() -> Vec<LootTable> {
    let starter = LootTable::new("Starter")
        .with_item("Starter_Sword", 1.0)
        .with_item("Starter_Bow", 1.0)
        .with_item("QA_Greatsword_2H", 0.5)
        .with_item("QA_Longbow_2H", 0.5)
        .with_item("QA_Staff_2H", 0.5)
        .with_item("Starter_Chest", 1.0);
    let starter = with_weights(starter, &RarityWeights::new(70.0, 22.0, 6.0, 1.8, 0.18, 0.02));

    let tuning = zone1_tuning();
    let zone_items = |id: &str, set_weight: f32| {
        LootTable::new(id)
            .with_item("Starter_Sword", 1.0)
            .with_item("Starter_Bow", 1.0)
            .with_item("QA_Staff_2H", 0.5)
            .with_item("Starter_Chest", 1.0)
            .with_item("Initiate_Hood", set_weight)
            .with_item("Initiate_Robe", set_weight)
            .with_item("Initiate_Leggings", set_weight)
    };

    vec![
        starter,
        with_weights(zone_items("Zone1_Trash", 0.1), &tuning.trash_weights),
        with_weights(zone_items("Zone1_Elite", 0.25), &tuning.elite_weights),
        with_weights(zone_items("Zone1_Boss", 0.5), &tuning.boss_weights),
    ]
}

pub fn zone1_tuning() -> ZoneLootTuning {
    ZoneLootTuning {
        zone_id: "Zone1".into(),
        trash_weights: RarityWeights::new(68.0, 20.0, 10.0, 1.8, 0.2, 0.02),
        elite_weights: RarityWeights::new(45.0, 25.0, 20.0, 8.0, 1.8, 0.2),
        boss_weights: RarityWeights::new(20.0, 20.0, 35.0, 18.0, 6.0, 1.0),
        trash_item_level: ItemLevelRange::new(1, 5),
        elite_item_level: ItemLevelRange::new(4, 8),
        boss_item_level: ItemLevelRange::new(8, 12),
    }
}

pub fn default_threat_scaling() -> ThreatLootScaling {
    ThreatLootScaling {
        tiers: vec![
            ThreatLootTier::neutral(0.0),
            ThreatLootTier {
                min_threat: 2.0,
                common: 0.9,
                uncommon: 1.05,
                magic: 1.10,
                rare: 1.20,
                epic: 1.30,
                legendary: 1.40,
                bonus_rolls: 0,
                bonus_roll_chance: 0.0,
            },
            ThreatLootTier {
                min_threat: 4.0,
                common: 0.8,
                uncommon: 1.10,
                magic: 1.20,
                rare: 1.35,
                epic: 1.50,
                legendary: 1.70,
                bonus_rolls: 1,
                bonus_roll_chance: 0.15,
            },
        ],
    }
}

pub fn default_tier_loot() -> TierLootConfig {
    let bucket = |tier: u32, entries: Vec<BucketEntry>| TierLootBucket { tier, entries };
    TierLootConfig {
        buckets: vec![
            bucket(1, vec![BucketEntry::new("Iron_Scrap", 1, 1, 2)]),
            bucket(2, vec![BucketEntry::new("Iron_Scrap", 3, 1, 3), BucketEntry::new("Abyssal_Shard", 1, 1, 1)]),
            bucket(3, vec![BucketEntry::new("Iron_Scrap", 2, 2, 3), BucketEntry::new("Abyssal_Shard", 2, 1, 2)]),
            bucket(4, vec![BucketEntry::new("Abyssal_Shard", 3, 1, 3), BucketEntry::new("Abyss_Core", 1, 1, 1)]),
            bucket(5, vec![BucketEntry::new("Abyssal_Shard", 2, 2, 4), BucketEntry::new("Abyss_Core", 1, 1, 2)]),
        ],
    }
}

/// Abyssal Initiate pieces from Zone1 tables: trash 0.5%, elite 2%, boss 6%
pub fn zone1_set_drops() -> SetDropConfig {
    SetDropConfig {
        set_id: "AbyssalInitiate".into(),
        zone: "Zone1".into(),
        pieces: vec!["Initiate_Hood".into(), "Initiate_Robe".into(), "Initiate_Leggings".into()],
        trash: SetDropTier::new(0.5, 1),
        elite: SetDropTier::new(2.0, 1),
        boss: SetDropTier::new(6.0, 1),
        boss_pity: BossPityConfig { enabled: true, threshold_kills: 10, guarantee_one_piece: true },
    }
}

pub fn zone1_zone_table() -> ZoneLootTable {
    use ItemRarity::*;

    ZoneLootTable {
        id: "Zone1".into(),
        zone_pool: vec![
            ZonePoolEntry::new("Starter_Sword", Common),
            ZonePoolEntry::new("Starter_Bow", Common),
            ZonePoolEntry::new("Starter_Chest", Uncommon),
            ZonePoolEntry::new("QA_Greatsword_2H", Magic),
            ZonePoolEntry::new("QA_Longbow_2H", Magic),
            ZonePoolEntry::new("QA_Staff_2H", Rare),
            ZonePoolEntry::new("Initiate_Hood", Set),
            ZonePoolEntry::new("Initiate_Robe", Set),
        ],
        materials_pool: vec![
            ZonePoolEntry::new("Iron_Scrap", Common),
            ZonePoolEntry::new("Abyssal_Shard", Uncommon),
        ],
        boss_uniques_pool: vec![ZonePoolEntry::new("Initiate_Leggings", Set)],
        ..ZoneLootTable::default()
    }
}

pub fn zone1_legacy_drop_table() -> DropTable {
    use ItemCategory::*;
    use ItemRarity::*;

    let trash = vec![
        DropEntry::new("Iron_Scrap", Material, Common, 0.35),
        DropEntry::new("Starter_Sword", Equipment, Common, 0.05),
    ];
    let normal = vec![
        DropEntry::new("Iron_Scrap", Material, Common, 0.45),
        DropEntry::new("Starter_Bow", Equipment, Common, 0.06),
        DropEntry::new("Starter_Chest", Equipment, Uncommon, 0.04),
    ];
    let elite = vec![
        DropEntry::new("Abyssal_Shard", Material, Uncommon, 0.3),
        DropEntry::new("QA_Greatsword_2H", Equipment, Magic, 0.08),
        DropEntry::new("QA_Staff_2H", Equipment, Rare, 0.03),
    ];
    let mini_boss = vec![
        DropEntry::new("Abyssal_Shard", Material, Uncommon, 0.6),
        DropEntry::new("QA_Staff_2H", Equipment, Rare, 0.1),
        DropEntry::new("Initiate_Robe", Equipment, Set, 0.02),
    ];

    DropTable {
        id: "Zone1_Legacy".into(),
        trash_drops: trash,
        normal_drops: normal,
        elite_drops: elite,
        mini_boss_drops: mini_boss,
        guaranteed: GuaranteedDropRule { enabled: true, ..GuaranteedDropRule::default() },
    }
}
