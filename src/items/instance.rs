//! Rolled item instances
//!
//! A concrete drop: base item, rarity, item level, scalar and rolled affixes.
//! Flattening an instance into stat modifiers happens here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::{format_value, StatMod, StatType};
use crate::data::LootRegistry;

/// One rolled affix on an instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixRoll {
    pub affix_id: String,
    pub value: f32,
}

/// A rolled item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub base_item_id: String,
    pub rarity_id: String,
    pub item_level: u32,
    pub base_scalar: f32,
    #[serde(default)]
    pub affixes: Vec<AffixRoll>,
}

impl ItemInstance {
    pub fn new(base_item_id: impl Into<String>, rarity_id: impl Into<String>, item_level: u32) -> Self {
        Self {
            base_item_id: base_item_id.into(),
            rarity_id: rarity_id.into(),
            item_level: item_level.max(1),
            base_scalar: 1.0,
            affixes: Vec::new(),
        }
    }

    /// A plain Common instance, used for material and bucket drops
    pub fn common(base_item_id: impl Into<String>, item_level: u32) -> Self {
        Self::new(base_item_id, "Common", item_level)
    }

    pub fn has_affix(&self, affix_id: &str) -> bool {
        self.affixes.iter().any(|a| a.affix_id.eq_ignore_ascii_case(affix_id))
    }

    /// Flatten into stat modifiers.
    ///
    /// Base stats are multiplied by the (non-negative) scalar. Affix values are
    /// used as rolled and take the percent flag from their definition. Ids that
    /// do not resolve are skipped.
    pub fn all_stat_mods(&self, registry: &LootRegistry) -> Vec<StatMod> {
        let mut mods = Vec::with_capacity(16);

        if let Some(base) = registry.item(&self.base_item_id) {
            let scalar = self.base_scalar.max(0.0);
            for m in &base.base_stats {
                mods.push(StatMod { value: m.value * scalar, ..*m });
            }
        }

        for roll in &self.affixes {
            if roll.affix_id.trim().is_empty() {
                continue;
            }
            let Some(affix) = registry.affix(&roll.affix_id) else {
                continue;
            };
            mods.push(StatMod {
                stat: affix.stat,
                value: roll.value,
                percent: affix.percent,
            });
        }

        mods
    }

    /// Sum of this instance's mods per stat
    pub fn stat_totals(&self, registry: &LootRegistry) -> StatTotals {
        StatTotals::from_mods(&self.all_stat_mods(registry))
    }

    /// Display name of the base item, falling back to its id
    pub fn display_name(&self, registry: &LootRegistry) -> String {
        registry
            .item(&self.base_item_id)
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| self.base_item_id.clone())
    }

    /// One line per rolled affix, e.g. `of Power: +3 Melee Damage`
    pub fn affix_lines(&self, registry: &LootRegistry) -> Vec<String> {
        self.affixes
            .iter()
            .filter_map(|roll| {
                let affix = registry.affix(&roll.affix_id)?;
                let line = StatMod { stat: affix.stat, value: roll.value, percent: affix.percent }.stat_line();
                Some(format!("{}: {}", affix.name(), line))
            })
            .collect()
    }

    /// Multi-line tooltip
    pub fn tooltip(&self, registry: &LootRegistry) -> String {
        let rarity_name = registry
            .rarity(&self.rarity_id)
            .map(|r| r.name().to_string())
            .unwrap_or_else(|| self.rarity_id.clone());

        let mut lines = vec![
            self.display_name(registry),
            format!("{} - Item Level {}", rarity_name, self.item_level),
        ];

        if let Some(base) = registry.item(&self.base_item_id) {
            let scalar = self.base_scalar.max(0.0);
            for m in &base.base_stats {
                lines.push(StatMod { value: m.value * scalar, ..*m }.stat_line());
            }
        }
        lines.extend(self.affix_lines(registry));

        lines.join("\n")
    }
}

/// Per-stat sums with flat and percent kept apart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTotals {
    pub flat: BTreeMap<StatType, f32>,
    pub percent: BTreeMap<StatType, f32>,
}

impl StatTotals {
    pub fn from_mods(mods: &[StatMod]) -> Self {
        let mut totals = Self::default();
        totals.add_all(mods);
        totals
    }

    pub fn add(&mut self, m: &StatMod) {
        let bucket = if m.percent { &mut self.percent } else { &mut self.flat };
        *bucket.entry(m.stat).or_insert(0.0) += m.value;
    }

    pub fn add_all(&mut self, mods: &[StatMod]) {
        for m in mods {
            self.add(m);
        }
    }

    pub fn merge(&mut self, other: &StatTotals) {
        for (stat, v) in &other.flat {
            *self.flat.entry(*stat).or_insert(0.0) += v;
        }
        for (stat, v) in &other.percent {
            *self.percent.entry(*stat).or_insert(0.0) += v;
        }
    }

    pub fn flat(&self, stat: StatType) -> f32 {
        self.flat.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn percent(&self, stat: StatType) -> f32 {
        self.percent.get(&stat).copied().unwrap_or(0.0)
    }

    /// Flat value rounded for integer combat math
    pub fn flat_rounded(&self, stat: StatType) -> i32 {
        self.flat(stat).round() as i32
    }

    /// Sum of the three damage stats
    pub fn damage_bonus(&self) -> f32 {
        self.flat
            .iter()
            .filter(|(stat, _)| stat.is_damage())
            .map(|(_, v)| *v)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.percent.is_empty()
    }

    /// Lines like `Melee Damage: 6` in stat order
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .flat
            .iter()
            .map(|(stat, v)| format!("{}: {}", stat.label(), format_value(*v)))
            .collect();
        lines.extend(
            self.percent
                .iter()
                .map(|(stat, v)| format!("{}: {}%", stat.label(), format_value(*v))),
        );
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::starter_registry;

    #[test]
    fn test_base_stats_scaled_and_affixes_appended() {
        let registry = starter_registry();
        let mut inst = ItemInstance::new("Starter_Chest", "Rare", 5);
        inst.base_scalar = 2.0;
        inst.affixes.push(AffixRoll { affix_id: "Bulwark".into(), value: 3.0 });

        let mods = inst.all_stat_mods(&registry);
        assert_eq!(mods.len(), 3);
        assert_eq!(mods[0], StatMod::flat(StatType::Defense, 2.0));
        assert_eq!(mods[1], StatMod::flat(StatType::MaxHealth, 10.0));
        assert_eq!(mods[2], StatMod::flat(StatType::Defense, 3.0));

        let totals = inst.stat_totals(&registry);
        assert_eq!(totals.flat(StatType::Defense), 5.0);
    }

    #[test]
    fn test_negative_scalar_clamps_to_zero() {
        let registry = starter_registry();
        let mut inst = ItemInstance::new("Starter_Sword", "Common", 1);
        inst.base_scalar = -3.0;
        let mods = inst.all_stat_mods(&registry);
        assert_eq!(mods[0].value, 0.0);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let registry = starter_registry();
        let mut inst = ItemInstance::new("No_Such_Item", "Common", 1);
        inst.affixes.push(AffixRoll { affix_id: "Nope".into(), value: 9.0 });
        inst.affixes.push(AffixRoll { affix_id: "  ".into(), value: 9.0 });
        inst.affixes.push(AffixRoll { affix_id: "power".into(), value: 2.0 });

        let mods = inst.all_stat_mods(&registry);
        assert_eq!(mods, vec![StatMod::flat(StatType::MeleeDamage, 2.0)]);
    }

    #[test]
    fn test_percent_flag_comes_from_definition() {
        let registry = starter_registry();
        let mut inst = ItemInstance::new("Starter_Bow", "Magic", 1);
        inst.affixes.push(AffixRoll { affix_id: "Fury".into(), value: 0.2 });
        let totals = inst.stat_totals(&registry);
        assert_eq!(totals.percent(StatType::AttackSpeed), 0.2);
        assert_eq!(totals.flat(StatType::AttackSpeed), 0.0);
    }

    #[test]
    fn test_item_level_floor() {
        assert_eq!(ItemInstance::new("x", "Common", 0).item_level, 1);
    }

    #[test]
    fn test_tooltip_contents() {
        let registry = starter_registry();
        let mut inst = ItemInstance::new("Starter_Sword", "Magic", 3);
        inst.affixes.push(AffixRoll { affix_id: "Power".into(), value: 3.0 });
        let text = inst.tooltip(&registry);
        assert!(text.starts_with("Rusty Sword\nMagic - Item Level 3"));
        assert!(text.contains("+2 Melee Damage"));
        assert!(text.contains("of Power: +3 Melee Damage"));
    }
}
