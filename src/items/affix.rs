//! Affix definitions
//!
//! Rollable modifiers with optional item-level tiers.

use serde::{Deserialize, Serialize};

use super::item::{tags_intersect, AffixTag, ItemDefinition, StatType};

/// Roll range that applies within an item level bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffixTier {
    pub min_item_level: i32,
    pub max_item_level: i32,
    pub min_roll: f32,
    pub max_roll: f32,
}

impl AffixTier {
    pub fn new(min_item_level: i32, max_item_level: i32, min_roll: f32, max_roll: f32) -> Self {
        Self { min_item_level, max_item_level, min_roll, max_roll }
    }

    /// Level bracket with both ends at least 1, swapped if authored backwards
    pub fn bracket(&self) -> (u32, u32) {
        let a = self.min_item_level.max(1) as u32;
        let b = self.max_item_level.max(1) as u32;
        if b < a { (b, a) } else { (a, b) }
    }
}

/// A rollable affix loaded from content data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDefinition {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    /// Affix families this can roll on
    #[serde(default)]
    pub tags: Vec<AffixTag>,
    /// Restrict to these slots; empty allows all
    #[serde(default)]
    pub allowed_slots: Vec<super::item::EquipSlot>,
    /// Relative likelihood. 100 is baseline, 0 or less never rolls.
    #[serde(default = "default_weight")]
    pub weight: i32,
    /// Tiered ranges by item level; empty uses `min_roll..max_roll`
    #[serde(default)]
    pub tiers: Vec<AffixTier>,
    pub stat: StatType,
    pub min_roll: f32,
    pub max_roll: f32,
    #[serde(default)]
    pub percent: bool,
}

fn default_weight() -> i32 {
    100
}

impl AffixDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, stat: StatType, min_roll: f32, max_roll: f32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            tags: Vec::new(),
            allowed_slots: Vec::new(),
            weight: default_weight(),
            tiers: Vec::new(),
            stat,
            min_roll,
            max_roll,
            percent: false,
        }
    }

    pub fn with_tags(mut self, tags: &[AffixTag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_tier(mut self, tier: AffixTier) -> Self {
        self.tiers.push(tier);
        self
    }

    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.weight > 0
    }

    /// Whether this affix may roll on the given base item
    pub fn is_eligible_for(&self, item: &ItemDefinition) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if !self.allowed_slots.is_empty() && !self.allowed_slots.contains(&item.slot) {
            return false;
        }
        tags_intersect(&item.allowed_affix_tags, &self.tags)
    }

    /// Roll range for an item level.
    ///
    /// Picks the narrowest tier whose bracket contains the level, preferring the
    /// higher minimum level on ties. Falls back to the base range.
    pub fn roll_range(&self, item_level: u32) -> (f32, f32) {
        let level = item_level.max(1);

        let mut best: Option<(&AffixTier, u32, u32)> = None;
        for tier in &self.tiers {
            let (min_lvl, max_lvl) = tier.bracket();
            if level < min_lvl || level > max_lvl {
                continue;
            }
            let width = max_lvl - min_lvl;
            let better = match best {
                None => true,
                Some((_, best_width, best_min)) => {
                    width < best_width || (width == best_width && min_lvl > best_min)
                }
            };
            if better {
                best = Some((tier, width, min_lvl));
            }
        }

        match best {
            Some((tier, _, _)) => (tier.min_roll, tier.max_roll),
            None => (self.min_roll, self.max_roll),
        }
    }
}

/// Named list of affix ids, used for zone specific pools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixPool {
    pub id: String,
    pub affixes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::EquipSlot;

    fn power() -> AffixDefinition {
        AffixDefinition::new("Power", "of Power", StatType::MeleeDamage, 1.0, 4.0)
            .with_tags(&[AffixTag::WeaponMelee])
    }

    #[test]
    fn test_roll_range_without_tiers() {
        assert_eq!(power().roll_range(30), (1.0, 4.0));
    }

    #[test]
    fn test_roll_range_prefers_narrowest_tier() {
        let affix = power()
            .with_tier(AffixTier::new(1, 20, 1.0, 5.0))
            .with_tier(AffixTier::new(5, 10, 3.0, 6.0));
        assert_eq!(affix.roll_range(7), (3.0, 6.0));
        assert_eq!(affix.roll_range(15), (1.0, 5.0));
        assert_eq!(affix.roll_range(25), (1.0, 4.0));
    }

    #[test]
    fn test_roll_range_tie_prefers_higher_bracket() {
        let affix = power()
            .with_tier(AffixTier::new(1, 5, 1.0, 2.0))
            .with_tier(AffixTier::new(5, 9, 2.0, 3.0));
        assert_eq!(affix.roll_range(5), (2.0, 3.0));
    }

    #[test]
    fn test_reversed_and_zero_brackets_are_normalized() {
        let affix = power().with_tier(AffixTier::new(10, 0, 7.0, 8.0));
        // Bracket becomes 1..=10
        assert_eq!(affix.roll_range(0), (7.0, 8.0));
        assert_eq!(affix.roll_range(10), (7.0, 8.0));
        assert_eq!(affix.roll_range(11), (1.0, 4.0));
    }

    #[test]
    fn test_eligibility() {
        let sword = ItemDefinition::new("Sword", "Sword", EquipSlot::RightHand)
            .with_tags(&[AffixTag::WeaponMelee]);
        let chest = ItemDefinition::new("Chest", "Chest", EquipSlot::Chest)
            .with_tags(&[AffixTag::Armor]);

        assert!(power().is_eligible_for(&sword));
        assert!(!power().is_eligible_for(&chest));
        assert!(!power().with_weight(0).is_eligible_for(&sword));

        let mut ring_only = power();
        ring_only.allowed_slots = vec![EquipSlot::Ring1];
        assert!(!ring_only.is_eligible_for(&sword));
    }
}
