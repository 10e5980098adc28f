//! Equipment system
//!
//! Tracks equipped item instances and aggregates their stat modifiers,
//! including set bonuses.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::instance::{ItemInstance, StatTotals};
use super::item::EquipSlot;
use super::sets::{active_set_bonuses, ActiveSetBonuses};
use crate::data::{normalize_id, LootRegistry};
use crate::error::{LootError, LootResult};

/// Player equipment slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// Instance stored under its primary slot
    slots: HashMap<EquipSlot, ItemInstance>,
    /// Secondary slot -> primary slot for items spanning several slots
    spanned: HashMap<EquipSlot, EquipSlot>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip an instance, returning every item it displaced
    pub fn equip(&mut self, instance: ItemInstance, registry: &LootRegistry) -> LootResult<Vec<ItemInstance>> {
        let def = registry
            .item(&instance.base_item_id)
            .ok_or_else(|| LootError::UnknownItem(instance.base_item_id.clone()))?;
        if !def.is_equippable() {
            return Err(LootError::NotEquippable(def.id.clone()));
        }

        let primary = def.slot;
        let mut displaced = Vec::new();
        for slot in def.occupied_slots() {
            if let Some(old) = self.unequip(slot) {
                displaced.push(old);
            }
        }

        for slot in def.occupied_slots() {
            if slot != primary {
                self.spanned.insert(slot, primary);
            }
        }
        log::debug!("Equipped {} in {}", def.name(), primary.name());
        self.slots.insert(primary, instance);

        Ok(displaced)
    }

    /// Unequip whatever occupies a slot, including items spanning into it
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<ItemInstance> {
        let primary = self.spanned.get(&slot).copied().unwrap_or(slot);
        let removed = self.slots.remove(&primary);
        if removed.is_some() {
            self.spanned.retain(|_, p| *p != primary);
        }
        removed
    }

    /// Item occupying a slot
    pub fn get(&self, slot: EquipSlot) -> Option<&ItemInstance> {
        let primary = self.spanned.get(&slot).copied().unwrap_or(slot);
        self.slots.get(&primary)
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        self.get(slot).is_none()
    }

    /// Each equipped instance once, even when it spans several slots
    pub fn all_items(&self) -> impl Iterator<Item = &ItemInstance> {
        self.slots.values()
    }

    /// Number of equipped pieces per set id. Ids match case-insensitively and
    /// are keyed by the registered set's id when it exists.
    pub fn set_counts(&self, registry: &LootRegistry) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for inst in self.all_items() {
            let Some(def) = registry.item(&inst.base_item_id) else {
                continue;
            };
            let Some(set_id) = def.set_id.as_deref().filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            let key = match registry.set(set_id) {
                Some(set) => set.set_id.clone(),
                None => normalize_id(set_id),
            };
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    pub fn set_bonuses(&self, registry: &LootRegistry) -> ActiveSetBonuses {
        active_set_bonuses(&self.set_counts(registry), |id| registry.set(id))
    }

    /// All equipment modifiers plus active set bonuses
    pub fn stat_totals(&self, registry: &LootRegistry) -> StatTotals {
        let mut totals = StatTotals::default();
        for inst in self.all_items() {
            totals.add_all(&inst.all_stat_mods(registry));
        }
        totals.add_all(&self.set_bonuses(registry).modifiers);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::starter_registry;
    use crate::items::item::StatType;

    #[test]
    fn test_two_handed_fills_both_hands() {
        let registry = starter_registry();
        let mut eq = Equipment::new();

        let sword = ItemInstance::common("Starter_Sword", 1);
        assert!(eq.equip(sword, &registry).unwrap().is_empty());

        let greatsword = ItemInstance::common("QA_Greatsword_2H", 1);
        let displaced = eq.equip(greatsword, &registry).unwrap();
        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].base_item_id, "Starter_Sword");

        assert_eq!(eq.get(EquipSlot::LeftHand).unwrap().base_item_id, "QA_Greatsword_2H");
        assert_eq!(eq.all_items().count(), 1);

        // Clearing either hand removes the two-hander
        let removed = eq.unequip(EquipSlot::LeftHand).unwrap();
        assert_eq!(removed.base_item_id, "QA_Greatsword_2H");
        assert!(eq.is_empty(EquipSlot::RightHand));
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let registry = starter_registry();
        let mut eq = Equipment::new();
        let err = eq.equip(ItemInstance::common("Ghost", 1), &registry).unwrap_err();
        assert!(matches!(err, LootError::UnknownItem(_)));
    }

    #[test]
    fn test_totals_include_set_bonus() {
        let registry = starter_registry();
        let mut eq = Equipment::new();
        eq.equip(ItemInstance::common("Initiate_Hood", 1), &registry).unwrap();
        eq.equip(ItemInstance::common("Initiate_Robe", 1), &registry).unwrap();

        let counts = eq.set_counts(&registry);
        assert_eq!(counts.get("AbyssalInitiate"), Some(&2));

        let bonuses = eq.set_bonuses(&registry);
        assert_eq!(bonuses.tier_keys, vec!["SetBonus:AbyssalInitiate:2"]);

        // Hood 1 def + Robe 2 def, set bonus adds 10 max health
        let totals = eq.stat_totals(&registry);
        assert_eq!(totals.flat(StatType::Defense), 3.0);
        assert_eq!(totals.flat(StatType::MaxHealth), 10.0);
    }

    #[test]
    fn test_set_ids_count_case_insensitively() {
        let mut registry = starter_registry();
        let mut hood = registry.item("Initiate_Hood").unwrap().clone();
        hood.set_id = Some("abyssalinitiate".into());
        registry.register_or_update_item(hood);
        let mut robe = registry.item("Initiate_Robe").unwrap().clone();
        robe.set_id = Some(" ABYSSALINITIATE ".into());
        registry.register_or_update_item(robe);

        let mut eq = Equipment::new();
        eq.equip(ItemInstance::common("Initiate_Hood", 1), &registry).unwrap();
        eq.equip(ItemInstance::common("Initiate_Robe", 1), &registry).unwrap();

        let counts = eq.set_counts(&registry);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("AbyssalInitiate"), Some(&2));
        assert_eq!(eq.set_bonuses(&registry).tier_keys, vec!["SetBonus:AbyssalInitiate:2"]);

        // Unregistered sets still merge under one normalized key
        let mut ghost_a = registry.item("Starter_Sword").unwrap().clone();
        ghost_a.set_id = Some("Phantom".into());
        registry.register_or_update_item(ghost_a);
        let mut ghost_b = registry.item("Initiate_Leggings").unwrap().clone();
        ghost_b.set_id = Some("PHANTOM".into());
        registry.register_or_update_item(ghost_b);
        eq.equip(ItemInstance::common("Starter_Sword", 1), &registry).unwrap();
        eq.equip(ItemInstance::common("Initiate_Leggings", 1), &registry).unwrap();
        assert_eq!(eq.set_counts(&registry).get(&normalize_id("Phantom")), Some(&2));
    }
}
