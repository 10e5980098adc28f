//! Zone loot roller
//!
//! Pools of fixed-rarity items rolled with per-enemy-tier rarity chances,
//! plus the boss overrides (extra rolls, uniques, guaranteed rarity).

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weighted::{next01, pick_index};

/// Fixed item rarity tiers, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Magic,
    Rare,
    Epic,
    Legendary,
    Set,
    Radiant,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 8] = [
        ItemRarity::Common,
        ItemRarity::Uncommon,
        ItemRarity::Magic,
        ItemRarity::Rare,
        ItemRarity::Epic,
        ItemRarity::Legendary,
        ItemRarity::Set,
        ItemRarity::Radiant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ItemRarity::Common => "Common",
            ItemRarity::Uncommon => "Uncommon",
            ItemRarity::Magic => "Magic",
            ItemRarity::Rare => "Rare",
            ItemRarity::Epic => "Epic",
            ItemRarity::Legendary => "Legendary",
            ItemRarity::Set => "Set",
            ItemRarity::Radiant => "Radiant",
        }
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enemy classification used by zone and legacy drop tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyTier {
    Trash,
    #[default]
    Normal,
    Elite,
    MiniBoss,
}

impl EnemyTier {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "trash" => Some(EnemyTier::Trash),
            "normal" => Some(EnemyTier::Normal),
            "elite" => Some(EnemyTier::Elite),
            "miniboss" | "mini_boss" | "mini-boss" => Some(EnemyTier::MiniBoss),
            _ => None,
        }
    }
}

/// Chance of each rarity per roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RarityChances {
    pub common: f32,
    pub uncommon: f32,
    pub magic: f32,
    pub rare: f32,
    pub epic: f32,
    pub legendary: f32,
    pub set: f32,
    pub radiant: f32,
}

impl RarityChances {
    pub fn total(&self) -> f32 {
        self.common
            + self.uncommon
            + self.magic
            + self.rare
            + self.epic
            + self.legendary
            + self.set
            + self.radiant
    }

    fn in_order(&self) -> [(ItemRarity, f32); 8] {
        [
            (ItemRarity::Common, self.common),
            (ItemRarity::Uncommon, self.uncommon),
            (ItemRarity::Magic, self.magic),
            (ItemRarity::Rare, self.rare),
            (ItemRarity::Epic, self.epic),
            (ItemRarity::Legendary, self.legendary),
            (ItemRarity::Set, self.set),
            (ItemRarity::Radiant, self.radiant),
        ]
    }

    /// Roll a rarity. `None` when the chances sum to zero or less.
    pub fn roll(&self, rng: &mut impl Rng) -> Option<ItemRarity> {
        let total = self.total().max(0.0);
        if total <= 0.0 {
            return None;
        }

        let mut r = next01(rng) * total;
        for (rarity, chance) in self.in_order() {
            r -= chance;
            if r <= 0.0 {
                return Some(rarity);
            }
        }
        Some(ItemRarity::Common)
    }
}

/// Item in a zone pool with its fixed rarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePoolEntry {
    pub item: String,
    #[serde(default)]
    pub rarity: ItemRarity,
}

impl ZonePoolEntry {
    pub fn new(item: impl Into<String>, rarity: ItemRarity) -> Self {
        Self { item: item.into(), rarity }
    }
}

/// Per-tier roll counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRolls {
    pub trash: u32,
    pub normal: u32,
    pub elite: u32,
    pub mini_boss: u32,
}

impl TierRolls {
    pub fn get(&self, tier: EnemyTier) -> u32 {
        match tier {
            EnemyTier::Trash => self.trash,
            EnemyTier::Normal => self.normal,
            EnemyTier::Elite => self.elite,
            EnemyTier::MiniBoss => self.mini_boss,
        }
    }
}

/// Zone-wide drop table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneLootTable {
    pub id: String,

    /// Zone-wide drops (equipment, consumables, misc)
    pub zone_pool: Vec<ZonePoolEntry>,
    /// Rolled separately when `roll_materials` is set
    pub materials_pool: Vec<ZonePoolEntry>,
    /// Only rolled by boss overrides
    pub boss_uniques_pool: Vec<ZonePoolEntry>,

    pub trash_chances: RarityChances,
    pub normal_chances: RarityChances,
    pub elite_chances: RarityChances,
    pub mini_boss_chances: RarityChances,

    pub zone_rolls: TierRolls,
    pub roll_materials: bool,
    pub material_rolls: TierRolls,

    pub enable_boss_overrides: bool,
    pub boss_zone_rolls: u32,
    pub boss_materials_rolls: u32,
    pub boss_unique_rolls: u32,
    /// Bosses always drop at least this rarity from the zone pool
    pub boss_guaranteed_min_rarity: ItemRarity,
    pub boss_guaranteed_attempts: u32,
}

impl Default for ZoneLootTable {
    fn default() -> Self {
        Self {
            id: String::new(),
            zone_pool: Vec::new(),
            materials_pool: Vec::new(),
            boss_uniques_pool: Vec::new(),
            trash_chances: RarityChances {
                common: 0.05,
                uncommon: 0.03,
                magic: 0.02,
                rare: 0.015,
                epic: 0.005,
                legendary: 0.001,
                set: 0.0085,
                radiant: 0.0001,
            },
            normal_chances: RarityChances {
                common: 0.06,
                uncommon: 0.035,
                magic: 0.025,
                rare: 0.02,
                epic: 0.0075,
                legendary: 0.0015,
                set: 0.01,
                radiant: 0.00012,
            },
            elite_chances: RarityChances {
                common: 0.07,
                uncommon: 0.04,
                magic: 0.03,
                rare: 0.025,
                epic: 0.01,
                legendary: 0.0025,
                set: 0.0125,
                radiant: 0.0002,
            },
            mini_boss_chances: RarityChances {
                common: 0.08,
                uncommon: 0.045,
                magic: 0.035,
                rare: 0.03,
                epic: 0.015,
                legendary: 0.004,
                set: 0.015,
                radiant: 0.0004,
            },
            zone_rolls: TierRolls { trash: 1, normal: 1, elite: 1, mini_boss: 2 },
            roll_materials: true,
            material_rolls: TierRolls { trash: 0, normal: 0, elite: 1, mini_boss: 2 },
            enable_boss_overrides: true,
            boss_zone_rolls: 3,
            boss_materials_rolls: 3,
            boss_unique_rolls: 1,
            boss_guaranteed_min_rarity: ItemRarity::Rare,
            boss_guaranteed_attempts: 12,
        }
    }
}

impl ZoneLootTable {
    pub fn chances(&self, tier: EnemyTier) -> &RarityChances {
        match tier {
            EnemyTier::Trash => &self.trash_chances,
            EnemyTier::Normal => &self.normal_chances,
            EnemyTier::Elite => &self.elite_chances,
            EnemyTier::MiniBoss => &self.mini_boss_chances,
        }
    }

    pub fn material_rolls_for(&self, tier: EnemyTier) -> u32 {
        if self.roll_materials {
            self.material_rolls.get(tier)
        } else {
            0
        }
    }
}

/// Roll `rolls` times from a pool, picking a rarity first.
/// When the pool has nothing of that rarity any pool item is taken instead.
fn roll_from_pool(
    pool: &[ZonePoolEntry],
    rolls: u32,
    chances: &RarityChances,
    results: &mut Vec<ZonePoolEntry>,
    rng: &mut impl Rng,
) {
    if pool.is_empty() {
        return;
    }

    for _ in 0..rolls {
        let Some(rarity) = chances.roll(rng) else {
            continue;
        };
        let matching: Vec<&ZonePoolEntry> = pool.iter().filter(|e| e.rarity == rarity).collect();
        let picked = if matching.is_empty() {
            &pool[pick_index(pool.len(), rng)]
        } else {
            matching[pick_index(matching.len(), rng)]
        };
        results.push(picked.clone());
    }
}

/// Zone and material rolls for one enemy of the given tier
pub fn roll_zone(table: &ZoneLootTable, tier: EnemyTier, rng: &mut impl Rng) -> Vec<ZonePoolEntry> {
    let mut results = Vec::new();
    let chances = table.chances(tier);

    roll_from_pool(&table.zone_pool, table.zone_rolls.get(tier), chances, &mut results, rng);
    roll_from_pool(&table.materials_pool, table.material_rolls_for(tier), chances, &mut results, rng);

    log::debug!("Zone table '{}' rolled {} drops for {:?}", table.id, results.len(), tier);
    results
}

/// Add boss rolls to `results` and enforce the guaranteed minimum rarity
pub fn apply_boss_overrides(table: &ZoneLootTable, results: &mut Vec<ZonePoolEntry>, rng: &mut impl Rng) {
    if !table.enable_boss_overrides {
        return;
    }

    let chances = &table.mini_boss_chances;
    let material_rolls = if table.roll_materials { table.boss_materials_rolls } else { 0 };

    roll_from_pool(&table.zone_pool, table.boss_zone_rolls, chances, results, rng);
    roll_from_pool(&table.materials_pool, material_rolls, chances, results, rng);

    if !table.boss_uniques_pool.is_empty() {
        for _ in 0..table.boss_unique_rolls {
            let idx = pick_index(table.boss_uniques_pool.len(), rng);
            results.push(table.boss_uniques_pool[idx].clone());
        }
    }

    apply_guaranteed_min_rarity(table, results, rng);
}

fn apply_guaranteed_min_rarity(table: &ZoneLootTable, results: &mut Vec<ZonePoolEntry>, rng: &mut impl Rng) {
    let min = table.boss_guaranteed_min_rarity;
    let satisfied = |results: &[ZonePoolEntry]| results.iter().any(|e| e.rarity >= min);

    if satisfied(results) {
        return;
    }

    let eligible: Vec<&ZonePoolEntry> = table.zone_pool.iter().filter(|e| e.rarity >= min).collect();
    if eligible.is_empty() {
        log::warn!(
            "Zone table '{}' guarantees {} for bosses but its zone pool has nothing that rare",
            table.id,
            min
        );
        return;
    }

    for _ in 0..table.boss_guaranteed_attempts.max(1) {
        if satisfied(results) {
            return;
        }
        results.push(eligible[pick_index(eligible.len(), rng)].clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn only(rarity: ItemRarity) -> RarityChances {
        let mut c = RarityChances::default();
        match rarity {
            ItemRarity::Common => c.common = 1.0,
            ItemRarity::Uncommon => c.uncommon = 1.0,
            ItemRarity::Magic => c.magic = 1.0,
            ItemRarity::Rare => c.rare = 1.0,
            ItemRarity::Epic => c.epic = 1.0,
            ItemRarity::Legendary => c.legendary = 1.0,
            ItemRarity::Set => c.set = 1.0,
            ItemRarity::Radiant => c.radiant = 1.0,
        }
        c
    }

    fn table() -> ZoneLootTable {
        ZoneLootTable {
            id: "Zone1".into(),
            zone_pool: vec![
                ZonePoolEntry::new("Dagger", ItemRarity::Common),
                ZonePoolEntry::new("Blade", ItemRarity::Rare),
            ],
            materials_pool: vec![ZonePoolEntry::new("Ore", ItemRarity::Common)],
            boss_uniques_pool: vec![ZonePoolEntry::new("Crown", ItemRarity::Legendary)],
            ..ZoneLootTable::default()
        }
    }

    #[test]
    fn test_rarity_order() {
        assert!(ItemRarity::Common < ItemRarity::Magic);
        assert!(ItemRarity::Legendary < ItemRarity::Set);
        assert!(ItemRarity::Set < ItemRarity::Radiant);
    }

    #[test]
    fn test_default_counts() {
        let t = ZoneLootTable::default();
        assert_eq!(t.zone_rolls.get(EnemyTier::MiniBoss), 2);
        assert_eq!(t.material_rolls_for(EnemyTier::Elite), 1);
        assert_eq!(t.material_rolls_for(EnemyTier::Trash), 0);
        assert_eq!(t.boss_guaranteed_attempts, 12);
        assert!((t.trash_chances.total() - 0.1296).abs() < 1e-4);
    }

    #[test]
    fn test_zero_chances_roll_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(RarityChances::default().roll(&mut rng).is_none());

        let mut t = table();
        t.normal_chances = RarityChances::default();
        assert!(roll_zone(&t, EnemyTier::Normal, &mut rng).is_empty());
    }

    #[test]
    fn test_rolled_rarity_picks_matching_item() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut t = table();
        t.trash_chances = only(ItemRarity::Rare);
        for _ in 0..20 {
            let drops = roll_zone(&t, EnemyTier::Trash, &mut rng);
            assert_eq!(drops.len(), 1);
            assert_eq!(drops[0].item, "Blade");
        }
    }

    #[test]
    fn test_missing_rarity_falls_back_to_any_item() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut t = table();
        t.trash_chances = only(ItemRarity::Radiant);
        let drops = roll_zone(&t, EnemyTier::Trash, &mut rng);
        assert_eq!(drops.len(), 1);
        assert!(["Dagger", "Blade"].contains(&drops[0].item.as_str()));
    }

    #[test]
    fn test_materials_disabled() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut t = table();
        t.mini_boss_chances = only(ItemRarity::Common);
        assert_eq!(roll_zone(&t, EnemyTier::MiniBoss, &mut rng).len(), 4);
        t.roll_materials = false;
        assert_eq!(roll_zone(&t, EnemyTier::MiniBoss, &mut rng).len(), 2);
    }

    #[test]
    fn test_boss_overrides_guarantee_rarity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut t = table();
        t.mini_boss_chances = only(ItemRarity::Common);
        t.boss_uniques_pool.clear();

        let mut results = Vec::new();
        apply_boss_overrides(&t, &mut results, &mut rng);
        // 3 zone + 3 material rolls, then exactly one guaranteed pick
        assert_eq!(results.len(), 7);
        assert_eq!(results.last().map(|e| e.item.as_str()), Some("Blade"));
        assert_eq!(results.iter().filter(|e| e.rarity >= ItemRarity::Rare).count(), 1);
    }

    #[test]
    fn test_boss_unique_satisfies_guarantee() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut t = table();
        t.mini_boss_chances = only(ItemRarity::Common);
        let mut results = Vec::new();
        apply_boss_overrides(&t, &mut results, &mut rng);
        assert_eq!(results.len(), 7);
        assert!(results.iter().any(|e| e.item == "Crown"));
    }

    #[test]
    fn test_guarantee_without_eligible_items() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = table();
        t.mini_boss_chances = only(ItemRarity::Common);
        t.boss_uniques_pool.clear();
        t.zone_pool.retain(|e| e.rarity == ItemRarity::Common);
        let mut results = Vec::new();
        apply_boss_overrides(&t, &mut results, &mut rng);
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn test_overrides_disabled() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut t = table();
        t.enable_boss_overrides = false;
        let mut results = Vec::new();
        apply_boss_overrides(&t, &mut results, &mut rng);
        assert!(results.is_empty());
    }
}
