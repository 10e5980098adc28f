//! Loot table simulation
//!
//! Rolls a table many times with the real roller and reports how rarities,
//! affixes and stats come out. Used for tuning tables from the command line.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::Serialize;

use crate::data::LootRegistry;
use crate::error::LootResult;
use crate::items::StatType;
use crate::loot::roll_item;

/// How many affixes the report lists
pub const TOP_AFFIXES: usize = 10;

/// Aggregated results of a simulation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct LootSimReport {
    pub table_id: String,
    pub item_level: u32,
    pub attempts: u32,
    pub rolled: u32,
    /// Rarity id and count, most common first
    pub rarity_counts: Vec<(String, u32)>,
    /// Affix id and count, most common first, at most `TOP_AFFIXES`
    pub top_affixes: Vec<(String, u32)>,
    /// Number of drops carrying each stat at least once
    pub stat_presence: BTreeMap<StatType, u32>,
}

impl LootSimReport {
    /// Share of attempts (0 - 100) whose drop carried `stat`
    pub fn stat_percent(&self, stat: StatType) -> f32 {
        percent(self.stat_presence.get(&stat).copied().unwrap_or(0), self.attempts)
    }

    pub fn rarity_count(&self, rarity_id: &str) -> u32 {
        self.rarity_counts
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(rarity_id))
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Simulated {} drops from '{}' @ item level {} ({} rolled)",
            self.attempts, self.table_id, self.item_level, self.rolled
        )];

        lines.push("Rarity counts:".to_string());
        for (id, n) in &self.rarity_counts {
            lines.push(format!("- {}: {}", id, n));
        }

        lines.push(format!("Top {} affixes:", TOP_AFFIXES));
        for (id, n) in &self.top_affixes {
            lines.push(format!("- {}: {}", id, n));
        }

        lines.push("Stat presence:".to_string());
        for stat in self.stat_presence.keys() {
            lines.push(format!("- {}: {:.1}%", stat.label(), self.stat_percent(*stat)));
        }
        lines
    }
}

fn percent(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f32 / total as f32
    }
}

/// Sort counts descending, ties by id so reports are stable
fn ranked(counts: HashMap<String, u32>) -> Vec<(String, u32)> {
    let mut ranked: Vec<(String, u32)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Roll `count` items from a table and aggregate the results
pub fn simulate_table(
    registry: &LootRegistry,
    table_id: &str,
    count: u32,
    item_level: u32,
    rng: &mut impl Rng,
) -> LootResult<LootSimReport> {
    let table = registry.require_table(table_id)?;

    let mut rarity_counts: HashMap<String, u32> = HashMap::new();
    let mut affix_counts: HashMap<String, u32> = HashMap::new();
    let mut stat_presence: BTreeMap<StatType, u32> = BTreeMap::new();
    let mut rolled = 0;

    for _ in 0..count {
        let Some(inst) = roll_item(registry, table, item_level, None, rng) else {
            continue;
        };
        rolled += 1;

        let rarity = if inst.rarity_id.trim().is_empty() {
            "(None)".to_string()
        } else {
            inst.rarity_id.clone()
        };
        *rarity_counts.entry(rarity).or_insert(0) += 1;

        for affix in inst.affixes.iter().filter(|a| !a.affix_id.trim().is_empty()) {
            *affix_counts.entry(affix.affix_id.clone()).or_insert(0) += 1;
        }

        let mut stats: Vec<StatType> = inst.all_stat_mods(registry).iter().map(|m| m.stat).collect();
        stats.sort();
        stats.dedup();
        for stat in stats {
            *stat_presence.entry(stat).or_insert(0) += 1;
        }
    }

    let mut top_affixes = ranked(affix_counts);
    top_affixes.truncate(TOP_AFFIXES);

    log::debug!("Simulated {} rolls from '{}', {} produced items", count, table.id, rolled);

    Ok(LootSimReport {
        table_id: table.id.clone(),
        item_level,
        attempts: count,
        rolled,
        rarity_counts: ranked(rarity_counts),
        top_affixes,
        stat_presence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::defaults::starter_registry;
    use crate::error::LootError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulate_counts_add_up() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(7);
        let report = simulate_table(&registry, "Starter", 200, 5, &mut rng).unwrap();

        assert_eq!(report.attempts, 200);
        assert_eq!(report.rolled, 200);
        let total: u32 = report.rarity_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 200);
        assert!(report.top_affixes.len() <= TOP_AFFIXES);

        // Sorted most common first
        assert!(report.rarity_counts.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(report.rarity_count("common") > 0);
    }

    #[test]
    fn test_stat_presence_percent() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(11);
        let report = simulate_table(&registry, "Starter", 100, 1, &mut rng).unwrap();

        // Every starter item carries a flat base stat
        let base_total: u32 = [StatType::MeleeDamage, StatType::RangedDamage, StatType::MagicDamage, StatType::Defense]
            .iter()
            .map(|s| report.stat_presence.get(s).copied().unwrap_or(0))
            .sum();
        assert!(base_total >= 100);

        let pct = report.stat_percent(StatType::MeleeDamage);
        assert!(pct > 0.0 && pct <= 100.0);
        assert_eq!(report.stat_percent(StatType::Cooking), 0.0);
    }

    #[test]
    fn test_simulate_is_repeatable() {
        let registry = starter_registry();
        let a = simulate_table(&registry, "Zone1_Boss", 50, 10, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = simulate_table(&registry, "Zone1_Boss", 50, 10, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.rarity_counts, b.rarity_counts);
        assert_eq!(a.top_affixes, b.top_affixes);
    }

    #[test]
    fn test_unknown_table() {
        let registry = starter_registry();
        let mut rng = StdRng::seed_from_u64(1);
        let err = simulate_table(&registry, "Nope", 10, 1, &mut rng).unwrap_err();
        assert!(matches!(err, LootError::UnknownTable(_)));
    }
}
