//! Derived combat stats
//!
//! Turns primary stats plus equipment modifiers into the numbers combat uses:
//! final damage, max health, flat damage reduction and hit chance.
//! Percent modifiers are carried on items but not applied here yet.

use serde::{Deserialize, Serialize};

use crate::data::LootRegistry;
use crate::items::{Equipment, StatMod, StatType};

/// Strength to melee damage ratio
pub const STRENGTH_TO_MELEE_DAMAGE: f32 = 0.5;

pub const BASE_HIT_CHANCE: f32 = 0.60;
pub const ATTACK_TO_HIT_CHANCE: f32 = 0.03;
pub const MIN_HIT_CHANCE: f32 = 0.05;
pub const MAX_HIT_CHANCE: f32 = 0.95;

/// Primary combat and skilling stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryStats {
    pub attack: i32,
    pub strength: i32,
    pub defence: i32,
    pub ranged: i32,
    pub magic: i32,
    pub alchemy: i32,
    pub mining: i32,
    pub woodcutting: i32,
    pub forging: i32,
    pub fishing: i32,
    pub cooking: i32,
}

impl PrimaryStats {
    /// Every stat at level 1
    pub fn level_one() -> Self {
        Self {
            attack: 1,
            strength: 1,
            defence: 1,
            ranged: 1,
            magic: 1,
            alchemy: 1,
            mining: 1,
            woodcutting: 1,
            forging: 1,
            fishing: 1,
            cooking: 1,
        }
    }

    fn slot(&mut self, stat: StatType) -> Option<&mut i32> {
        match stat {
            StatType::Attack => Some(&mut self.attack),
            StatType::Strength => Some(&mut self.strength),
            StatType::DefenseSkill => Some(&mut self.defence),
            StatType::RangedSkill => Some(&mut self.ranged),
            StatType::MagicSkill => Some(&mut self.magic),
            StatType::Alchemy => Some(&mut self.alchemy),
            StatType::Mining => Some(&mut self.mining),
            StatType::Woodcutting => Some(&mut self.woodcutting),
            StatType::Forging => Some(&mut self.forging),
            StatType::Fishing => Some(&mut self.fishing),
            StatType::Cooking => Some(&mut self.cooking),
            _ => None,
        }
    }

    /// Add to a primary stat. Non-primary stats are ignored.
    pub fn add(&mut self, stat: StatType, value: i32) {
        if let Some(slot) = self.slot(stat) {
            *slot += value;
        }
    }

    pub fn get(&self, stat: StatType) -> i32 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Strength => self.strength,
            StatType::DefenseSkill => self.defence,
            StatType::RangedSkill => self.ranged,
            StatType::MagicSkill => self.magic,
            StatType::Alchemy => self.alchemy,
            StatType::Mining => self.mining,
            StatType::Woodcutting => self.woodcutting,
            StatType::Forging => self.forging,
            StatType::Fishing => self.fishing,
            StatType::Cooking => self.cooking,
            _ => 0,
        }
    }

    /// Stat-wise sum
    pub fn combined(&self, other: &PrimaryStats) -> PrimaryStats {
        let mut total = *self;
        for stat in StatType::PRIMARY_COMBAT.iter().chain(StatType::PRIMARY_SKILLING.iter()) {
            total.add(*stat, other.get(*stat));
        }
        total
    }
}

/// Flat equipment contributions, rounded to whole points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentBonuses {
    pub damage: i32,
    pub max_health: i32,
    pub damage_reduction: i32,
    pub primary: PrimaryStats,
}

impl EquipmentBonuses {
    /// Accumulate flat mods. Damage only counts when `damage_applies` is set.
    pub fn add_mods(&mut self, mods: &[StatMod], damage_applies: bool) {
        for m in mods {
            if m.percent || !m.value.is_finite() {
                continue;
            }
            let v = (m.value.round_ties_even() as i32).max(0);
            if v == 0 {
                continue;
            }

            self.primary.add(m.stat, v);
            match m.stat {
                StatType::MaxHealth => self.max_health += v,
                StatType::Defense => self.damage_reduction += v,
                s if s.is_damage() && damage_applies => self.damage += v,
                _ => {}
            }
        }
    }

    /// Bonuses from everything equipped plus active set bonuses.
    /// Damage mods count only on items held in a hand.
    pub fn from_equipment(equipment: &Equipment, registry: &LootRegistry) -> Self {
        let mut bonuses = Self::default();
        for inst in equipment.all_items() {
            let in_hand = registry
                .item(&inst.base_item_id)
                .map(|def| def.occupied_slots().iter().any(|s| s.is_hand()))
                .unwrap_or(false);
            bonuses.add_mods(&inst.all_stat_mods(registry), in_hand);
        }
        bonuses.add_mods(&equipment.set_bonuses(registry).modifiers, true);
        bonuses
    }
}

/// Derived combat values with their components kept for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub base_damage: i32,
    pub equipment_damage_bonus: i32,
    pub strength_melee_bonus: i32,
    pub damage_final: i32,

    pub base_max_health: i32,
    pub equipment_max_health_bonus: i32,
    pub max_health: i32,

    pub damage_reduction_flat: i32,
}

impl DerivedStats {
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("DMG Base: {}", self.base_damage),
            format!("DMG Equip Bonus: {}", self.equipment_damage_bonus),
            format!("DMG Str Bonus: {}", self.strength_melee_bonus),
            format!("DMG Final: {}", self.damage_final),
            format!("HP Base: {}", self.base_max_health),
            format!("HP Equip Bonus: {}", self.equipment_max_health_bonus),
            format!("HP Max: {}", self.max_health),
            format!("DR Flat: {}", self.damage_reduction_flat),
        ]
    }
}

/// Melee damage granted by total strength
pub fn strength_melee_bonus(strength: i32) -> i32 {
    let strength = strength.max(1);
    (((strength - 1) as f32 * STRENGTH_TO_MELEE_DAMAGE).floor() as i32).max(0)
}

/// Compute derived stats from total primary stats and equipment bonuses
pub fn compute_derived(
    primary: &PrimaryStats,
    base_damage: i32,
    base_max_health: i32,
    equipment: &EquipmentBonuses,
) -> DerivedStats {
    let base_damage = base_damage.max(0);
    let equipment_damage_bonus = equipment.damage.max(0);
    let strength_melee_bonus = strength_melee_bonus(primary.strength);

    let base_max_health = base_max_health.max(1);
    let equipment_max_health_bonus = equipment.max_health.max(0);

    DerivedStats {
        base_damage,
        equipment_damage_bonus,
        strength_melee_bonus,
        damage_final: (base_damage + equipment_damage_bonus + strength_melee_bonus).max(1),
        base_max_health,
        equipment_max_health_bonus,
        max_health: (base_max_health + equipment_max_health_bonus).max(1),
        damage_reduction_flat: equipment.damage_reduction.max(0),
    }
}

/// Chance to hit (0.05 - 0.95). Both sides count as at least 1.
pub fn hit_chance(attack: i32, defence: i32) -> f32 {
    let attack = attack.max(1);
    let defence = defence.max(1);
    let chance = BASE_HIT_CHANCE + (attack - defence) as f32 * ATTACK_TO_HIT_CHANCE;
    chance.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}
