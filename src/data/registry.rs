//! Loot registry
//!
//! Case-insensitive lookup of every content definition, plus the store of
//! rolled instances handed out to inventories.

use std::collections::HashMap;

use uuid::Uuid;

use super::content::LootContent;
use crate::error::{LootError, LootResult};
use crate::items::{AffixDefinition, AffixPool, ItemDefinition, ItemInstance, ItemSetDefinition, RarityDefinition};
use crate::loot::{
    DropBonusConfig, DropTable, LootTable, SetDropConfig, ThreatDistanceConfig, ThreatLootScaling,
    TierLootConfig, ZoneLootTable, ZoneLootTuning,
};

/// Content types addressed by a string id
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for ItemDefinition {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for RarityDefinition {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AffixDefinition {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AffixPool {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for LootTable {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ItemSetDefinition {
    fn key(&self) -> &str {
        &self.set_id
    }
}

impl Keyed for ZoneLootTable {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for DropTable {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Lookup key: trimmed and lowercased
pub fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

/// Insertion-ordered collection indexed by normalized id
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }
}

impl<T: Keyed> Catalog<T> {
    /// Add an entry. Blank ids and ids already present are rejected.
    pub fn insert(&mut self, value: T) -> bool {
        let key = normalize_id(value.key());
        if key.is_empty() || self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(value);
        true
    }

    /// Add or replace an entry. Blank ids are ignored.
    pub fn upsert(&mut self, value: T) {
        let key = normalize_id(value.key());
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&i) => self.entries[i] = value,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(value);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(&normalize_id(id)).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(&normalize_id(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert all values, returning the ids that lost to an earlier entry
    fn extend(&mut self, values: impl IntoIterator<Item = T>) -> Vec<String> {
        let mut rejected = Vec::new();
        for value in values {
            let id = value.key().to_string();
            if !self.insert(value) {
                rejected.push(id);
            }
        }
        rejected
    }
}

/// All loot content, ready for rolling
#[derive(Debug, Clone, Default)]
pub struct LootRegistry {
    items: Catalog<ItemDefinition>,
    rarities: Catalog<RarityDefinition>,
    affixes: Catalog<AffixDefinition>,
    affix_pools: Catalog<AffixPool>,
    tables: Catalog<LootTable>,
    sets: Catalog<ItemSetDefinition>,
    zone_tables: Catalog<ZoneLootTable>,
    drop_tables: Catalog<DropTable>,
    zone_tunings: Vec<ZoneLootTuning>,
    threat_distance: ThreatDistanceConfig,
    threat_scaling: Option<ThreatLootScaling>,
    tier_loot: Option<TierLootConfig>,
    drop_bonus: DropBonusConfig,
    set_drops: Vec<SetDropConfig>,
    rolled: HashMap<String, ItemInstance>,
}

impl LootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index loaded content. Authored values are normalized and duplicate ids
    /// keep their first definition.
    pub fn from_content(content: LootContent) -> Self {
        let mut registry = Self::new();

        let rarities = content.rarities.into_iter().map(|mut r| {
            r.normalize();
            r
        });
        let tables = content.tables.into_iter().map(|mut t| {
            t.normalize();
            t
        });

        let dropped = [
            ("item", registry.items.extend(content.items)),
            ("rarity", registry.rarities.extend(rarities)),
            ("affix", registry.affixes.extend(content.affixes)),
            ("affix pool", registry.affix_pools.extend(content.affix_pools)),
            ("loot table", registry.tables.extend(tables)),
            ("set", registry.sets.extend(content.sets)),
            ("zone table", registry.zone_tables.extend(content.zone_tables)),
            ("drop table", registry.drop_tables.extend(content.drop_tables)),
        ];
        for (kind, ids) in dropped {
            for id in ids {
                log::warn!("Ignoring duplicate or blank {} id '{}'", kind, id);
            }
        }

        let mut threat_distance = content.threat.distance;
        threat_distance.normalize();

        registry.zone_tunings = content.zone_tunings;
        registry.threat_distance = threat_distance;
        registry.threat_scaling = content.threat.scaling;
        registry.tier_loot = content.tier_loot;
        registry.drop_bonus = content.drop_bonus;
        registry.set_drops = content.set_drops;

        log::info!(
            "Loot registry: {} items, {} rarities, {} affixes, {} tables, {} sets",
            registry.items.len(),
            registry.rarities.len(),
            registry.affixes.len(),
            registry.tables.len(),
            registry.sets.len()
        );
        registry
    }

    // Lookups

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn rarity(&self, id: &str) -> Option<&RarityDefinition> {
        self.rarities.get(id)
    }

    pub fn affix(&self, id: &str) -> Option<&AffixDefinition> {
        self.affixes.get(id)
    }

    pub fn affix_pool(&self, id: &str) -> Option<&AffixPool> {
        self.affix_pools.get(id)
    }

    pub fn table(&self, id: &str) -> Option<&LootTable> {
        self.tables.get(id)
    }

    /// Table lookup that reports unknown ids as an error
    pub fn require_table(&self, id: &str) -> LootResult<&LootTable> {
        self.table(id).ok_or_else(|| LootError::UnknownTable(id.to_string()))
    }

    pub fn set(&self, id: &str) -> Option<&ItemSetDefinition> {
        self.sets.get(id)
    }

    pub fn zone_table(&self, id: &str) -> Option<&ZoneLootTable> {
        self.zone_tables.get(id)
    }

    pub fn drop_table(&self, id: &str) -> Option<&DropTable> {
        self.drop_tables.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.iter()
    }

    pub fn rarities(&self) -> impl Iterator<Item = &RarityDefinition> {
        self.rarities.iter()
    }

    /// Every affix in registration order
    pub fn affixes(&self) -> impl Iterator<Item = &AffixDefinition> {
        self.affixes.iter()
    }

    pub fn tables(&self) -> impl Iterator<Item = &LootTable> {
        self.tables.iter()
    }

    pub fn sets(&self) -> impl Iterator<Item = &ItemSetDefinition> {
        self.sets.iter()
    }

    /// Resolve affix ids, skipping any that are unknown
    pub fn resolve_affixes(&self, ids: &[String]) -> Vec<&AffixDefinition> {
        ids.iter().filter_map(|id| self.affix(id)).collect()
    }

    /// First zone tuning whose zone id prefixes the table id
    pub fn zone_tuning_for(&self, table_id: &str) -> Option<&ZoneLootTuning> {
        self.zone_tunings.iter().find(|t| t.applies_to(table_id))
    }

    pub fn threat_distance(&self) -> &ThreatDistanceConfig {
        &self.threat_distance
    }

    pub fn threat_scaling(&self) -> Option<&ThreatLootScaling> {
        self.threat_scaling.as_ref()
    }

    pub fn tier_loot(&self) -> Option<&TierLootConfig> {
        self.tier_loot.as_ref()
    }

    pub fn drop_bonus(&self) -> DropBonusConfig {
        self.drop_bonus
    }

    pub fn set_drops(&self) -> impl Iterator<Item = &SetDropConfig> {
        self.set_drops.iter()
    }

    // Registration

    pub fn register_item(&mut self, item: ItemDefinition) -> bool {
        self.items.insert(item)
    }

    /// Register an item, replacing any existing definition with the same id
    pub fn register_or_update_item(&mut self, item: ItemDefinition) {
        self.items.upsert(item);
    }

    pub fn register_rarity(&mut self, mut rarity: RarityDefinition) -> bool {
        rarity.normalize();
        self.rarities.insert(rarity)
    }

    pub fn register_affix(&mut self, affix: AffixDefinition) -> bool {
        self.affixes.insert(affix)
    }

    pub fn register_affix_pool(&mut self, pool: AffixPool) -> bool {
        self.affix_pools.insert(pool)
    }

    pub fn register_table(&mut self, mut table: LootTable) -> bool {
        table.normalize();
        self.tables.insert(table)
    }

    pub fn register_set(&mut self, set: ItemSetDefinition) -> bool {
        self.sets.insert(set)
    }

    pub fn register_zone_table(&mut self, table: ZoneLootTable) -> bool {
        self.zone_tables.insert(table)
    }

    pub fn register_drop_table(&mut self, table: DropTable) -> bool {
        self.drop_tables.insert(table)
    }

    pub fn add_zone_tuning(&mut self, tuning: ZoneLootTuning) {
        self.zone_tunings.push(tuning);
    }

    pub fn set_threat_distance(&mut self, mut config: ThreatDistanceConfig) {
        config.normalize();
        self.threat_distance = config;
    }

    pub fn set_threat_scaling(&mut self, scaling: Option<ThreatLootScaling>) {
        self.threat_scaling = scaling;
    }

    pub fn set_tier_loot(&mut self, config: TierLootConfig) {
        self.tier_loot = Some(config);
    }

    pub fn set_drop_bonus(&mut self, bonus: DropBonusConfig) {
        self.drop_bonus = bonus;
    }

    pub fn set_set_drops(&mut self, configs: Vec<SetDropConfig>) {
        self.set_drops = configs;
    }

    // Rolled instances

    /// Store a rolled instance and return its id.
    ///
    /// A blank or missing preferred id gets a fresh `ri_<uuid>` id. Storing
    /// under an existing id replaces the previous instance.
    pub fn register_rolled_instance(&mut self, instance: ItemInstance, preferred_id: Option<&str>) -> String {
        let id = match preferred_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => format!("ri_{}", Uuid::new_v4().simple()),
        };
        self.rolled.insert(id.clone(), instance);
        id
    }

    pub fn rolled_instance(&self, rolled_id: &str) -> Option<&ItemInstance> {
        let rolled_id = rolled_id.trim();
        if rolled_id.is_empty() {
            return None;
        }
        self.rolled.get(rolled_id)
    }

    /// Display name of the base item behind a rolled id
    pub fn rolled_display_name(&self, rolled_id: &str) -> Option<&str> {
        let inst = self.rolled_instance(rolled_id)?;
        self.item(&inst.base_item_id).map(|i| i.name())
    }

    pub fn rolled_count(&self) -> usize {
        self.rolled.len()
    }
}
