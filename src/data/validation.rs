//! Validation for cross-references and numeric sanity in loot content.
//!
//! Loading never fails on bad references (rollers skip what they cannot
//! resolve), so this pass is how authors find out about them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::content::LootContent;
use super::registry::normalize_id;
use crate::loot::{zone_prefix, ItemLevelRange, RarityChances, RarityWeights, SetDropTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found in the content, with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub source_type: &'static str,
    pub source_id: String,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}: {} '{}' field '{}': {}",
            level, self.source_type, self.source_id, self.field, self.message
        )
    }
}

/// Normalized id sets for every referenceable collection
struct Known {
    items: HashSet<String>,
    rarities: HashSet<String>,
    affixes: HashSet<String>,
    sets: HashSet<String>,
}

impl Known {
    fn new(content: &LootContent) -> Self {
        fn ids<'a>(keys: impl Iterator<Item = &'a str>) -> HashSet<String> {
            keys.map(normalize_id).collect()
        }
        Self {
            items: ids(content.items.iter().map(|i| i.id.as_str())),
            rarities: ids(content.rarities.iter().map(|r| r.id.as_str())),
            affixes: ids(content.affixes.iter().map(|a| a.id.as_str())),
            sets: ids(content.sets.iter().map(|s| s.set_id.as_str())),
        }
    }
}

struct Report {
    issues: Vec<ValidationIssue>,
}

impl Report {
    fn push(
        &mut self,
        severity: Severity,
        source_type: &'static str,
        source_id: &str,
        field: &'static str,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            source_type,
            source_id: source_id.to_string(),
            field,
            message: message.into(),
        });
    }

    fn error(&mut self, source_type: &'static str, source_id: &str, field: &'static str, message: impl Into<String>) {
        self.push(Severity::Error, source_type, source_id, field, message);
    }

    fn warn(&mut self, source_type: &'static str, source_id: &str, field: &'static str, message: impl Into<String>) {
        self.push(Severity::Warning, source_type, source_id, field, message);
    }
}

/// Report a reference whose normalized id is not in `$known`
macro_rules! check_ref {
    ($report:expr, $known:expr, $source_type:expr, $source_id:expr, $field:expr, $target_type:expr, $ref_id:expr) => {
        if !$known.contains(&normalize_id($ref_id)) {
            $report.error(
                $source_type,
                $source_id,
                $field,
                format!("references missing {} '{}'", $target_type, $ref_id),
            );
        }
    };
}

/// Validate all references and numeric ranges in `content`.
/// Returns every issue found, errors first; empty when the content is clean.
pub fn validate(content: &LootContent) -> Vec<ValidationIssue> {
    let known = Known::new(content);
    let mut report = Report { issues: Vec::new() };

    check_duplicates(&mut report, content);
    check_items(&mut report, &known, content);
    check_rarities(&mut report, content);
    check_affixes(&mut report, content);
    check_pools(&mut report, &known, content);
    check_sets(&mut report, &known, content);
    check_tables(&mut report, &known, content);
    check_tunings(&mut report, content);
    check_threat(&mut report, content);
    check_tier_loot(&mut report, &known, content);
    check_zone_tables(&mut report, &known, content);
    check_drop_tables(&mut report, &known, content);
    check_set_drops(&mut report, &known, content);

    let mut issues = report.issues;
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    issues
}

fn check_duplicates(report: &mut Report, content: &LootContent) {
    fn scan<'a>(report: &mut Report, source_type: &'static str, field: &'static str, ids: impl Iterator<Item = &'a str>) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for id in ids {
            let count = seen.entry(normalize_id(id)).or_insert(0);
            *count += 1;
            if *count == 2 {
                report.warn(source_type, id, field, "duplicate id, later entries are ignored");
            }
        }
    }

    scan(report, "Item", "id", content.items.iter().map(|i| i.id.as_str()));
    scan(report, "Rarity", "id", content.rarities.iter().map(|r| r.id.as_str()));
    scan(report, "Affix", "id", content.affixes.iter().map(|a| a.id.as_str()));
    scan(report, "AffixPool", "id", content.affix_pools.iter().map(|p| p.id.as_str()));
    scan(report, "LootTable", "id", content.tables.iter().map(|t| t.id.as_str()));
    scan(report, "ItemSet", "set_id", content.sets.iter().map(|s| s.set_id.as_str()));
    scan(report, "ZoneLootTable", "id", content.zone_tables.iter().map(|t| t.id.as_str()));
    scan(report, "DropTable", "id", content.drop_tables.iter().map(|t| t.id.as_str()));

    for item in &content.items {
        if item.id.trim().is_empty() {
            report.error("Item", &item.id, "id", "empty id");
        }
    }
}

fn check_items(report: &mut Report, known: &Known, content: &LootContent) {
    for item in &content.items {
        if let Some(set_id) = &item.set_id {
            check_ref!(report, known.sets, "Item", &item.id, "set_id", "ItemSet", set_id);
        }
        for stat in &item.base_stats {
            if !stat.value.is_finite() {
                report.error("Item", &item.id, "base_stats", format!("{:?} is not a finite number", stat.stat));
            }
        }
    }
}

fn check_rarities(report: &mut Report, content: &LootContent) {
    for rarity in &content.rarities {
        if rarity.affix_min > rarity.affix_max {
            report.warn(
                "Rarity",
                &rarity.id,
                "affix_min",
                format!("affix range {}..{} is reversed", rarity.affix_min, rarity.affix_max),
            );
        }
        if rarity.scalar_min > rarity.scalar_max {
            report.warn(
                "Rarity",
                &rarity.id,
                "scalar_min",
                format!("scalar range {}..{} is reversed", rarity.scalar_min, rarity.scalar_max),
            );
        }
    }
    if !content.rarities.iter().any(|r| r.enabled) {
        report.error("Rarity", "*", "enabled", "no rarity is enabled, nothing can roll");
    }
}

fn check_affixes(report: &mut Report, content: &LootContent) {
    for affix in &content.affixes {
        if affix.weight < 0 {
            report.error("Affix", &affix.id, "weight", format!("negative weight {}", affix.weight));
        }
        if affix.min_roll > affix.max_roll {
            report.warn(
                "Affix",
                &affix.id,
                "min_roll",
                format!("roll range {}..{} is reversed", affix.min_roll, affix.max_roll),
            );
        }
        for tier in &affix.tiers {
            if tier.min_item_level > tier.max_item_level || tier.min_roll > tier.max_roll {
                report.warn(
                    "Affix",
                    &affix.id,
                    "tiers",
                    format!("tier for levels {}..{} has a reversed range", tier.min_item_level, tier.max_item_level),
                );
            }
        }
    }
}

fn check_pools(report: &mut Report, known: &Known, content: &LootContent) {
    for pool in &content.affix_pools {
        for affix_id in &pool.affixes {
            check_ref!(report, known.affixes, "AffixPool", &pool.id, "affixes", "Affix", affix_id);
        }
    }
}

fn check_sets(report: &mut Report, known: &Known, content: &LootContent) {
    for set in &content.sets {
        for piece in &set.pieces {
            check_ref!(report, known.items, "ItemSet", &set.set_id, "pieces", "Item", piece);
        }
        for bonus in &set.bonuses {
            if bonus.required_pieces as usize > set.pieces.len() {
                report.warn(
                    "ItemSet",
                    &set.set_id,
                    "bonuses",
                    format!(
                        "bonus needs {} pieces but the set only has {}",
                        bonus.required_pieces,
                        set.pieces.len()
                    ),
                );
            }
        }
    }
}

fn check_weight(report: &mut Report, source_type: &'static str, source_id: &str, field: &'static str, weight: f32) {
    if weight < 0.0 || weight.is_nan() {
        report.error(source_type, source_id, field, format!("invalid weight {}", weight));
    }
}

fn check_tables(report: &mut Report, known: &Known, content: &LootContent) {
    for table in &content.tables {
        for entry in &table.items {
            check_ref!(report, known.items, "LootTable", &table.id, "items", "Item", &entry.item);
            check_weight(report, "LootTable", &table.id, "items", entry.weight);
        }
        for entry in &table.rarities {
            check_ref!(report, known.rarities, "LootTable", &table.id, "rarities", "Rarity", &entry.rarity);
            check_weight(report, "LootTable", &table.id, "rarities", entry.weight);
        }
        for affix_id in &table.affix_pool_override {
            check_ref!(report, known.affixes, "LootTable", &table.id, "affix_pool_override", "Affix", affix_id);
        }
        if table.total_item_weight() <= 0.0 || table.total_rarity_weight() <= 0.0 {
            report.warn("LootTable", &table.id, "items", "table has nothing to roll");
        }
    }
}

fn check_rarity_weights(report: &mut Report, zone_id: &str, field: &'static str, weights: &RarityWeights) {
    let all = [
        weights.common,
        weights.uncommon,
        weights.magic,
        weights.rare,
        weights.epic,
        weights.legendary,
    ];
    if all.iter().any(|w| *w < 0.0 || w.is_nan()) {
        report.error("ZoneLootTuning", zone_id, field, "negative rarity weight");
    }
}

fn check_level_range(report: &mut Report, zone_id: &str, field: &'static str, range: &ItemLevelRange) {
    if range.min > range.max {
        report.warn(
            "ZoneLootTuning",
            zone_id,
            field,
            format!("item level range {}..{} is reversed", range.min, range.max),
        );
    }
}

fn check_tunings(report: &mut Report, content: &LootContent) {
    for tuning in &content.zone_tunings {
        let id = tuning.zone_id.as_str();
        if !is_zone_prefix(id) {
            report.warn("ZoneLootTuning", id, "zone_id", "not a Zone<N> prefix, matches no table");
        }
        check_rarity_weights(report, id, "trash_weights", &tuning.trash_weights);
        check_rarity_weights(report, id, "elite_weights", &tuning.elite_weights);
        check_rarity_weights(report, id, "boss_weights", &tuning.boss_weights);
        check_level_range(report, id, "trash_item_level", &tuning.trash_item_level);
        check_level_range(report, id, "elite_item_level", &tuning.elite_item_level);
        check_level_range(report, id, "boss_item_level", &tuning.boss_item_level);
    }
}

fn check_threat(report: &mut Report, content: &LootContent) {
    let distance = &content.threat.distance;
    if distance.step <= 0.0 {
        report.error("Threat", "distance", "step", format!("step {} must be positive", distance.step));
    }
    if distance.meters_thresholds.windows(2).any(|w| w[0] > w[1]) {
        report.warn("Threat", "distance", "meters_thresholds", "thresholds are not ascending");
    }

    if let Some(scaling) = &content.threat.scaling {
        for tier in &scaling.tiers {
            let source = format!("min_threat {}", tier.min_threat);
            let mults = [tier.common, tier.uncommon, tier.magic, tier.rare, tier.epic, tier.legendary];
            if mults.iter().any(|m| *m < 0.0 || m.is_nan()) {
                report.error("ThreatLootTier", &source, "multipliers", "negative rarity multiplier");
            }
            if !(0.0..=1.0).contains(&tier.bonus_roll_chance) {
                report.warn(
                    "ThreatLootTier",
                    &source,
                    "bonus_roll_chance",
                    format!("chance {} is outside 0..1", tier.bonus_roll_chance),
                );
            }
        }
    }
}

fn check_tier_loot(report: &mut Report, known: &Known, content: &LootContent) {
    let Some(config) = &content.tier_loot else {
        return;
    };
    for bucket in &config.buckets {
        let source = format!("tier {}", bucket.tier);
        if !(1..=5).contains(&bucket.tier) {
            report.warn("TierLootBucket", &source, "tier", "tier is outside 1..5 and is never selected");
        }
        for entry in &bucket.entries {
            check_ref!(report, known.items, "TierLootBucket", &source, "entries", "Item", &entry.item);
            if entry.weight < 0 {
                report.error("TierLootBucket", &source, "entries", format!("negative weight for '{}'", entry.item));
            }
            if entry.min_qty > entry.max_qty {
                report.warn(
                    "TierLootBucket",
                    &source,
                    "entries",
                    format!("quantity range {}..{} for '{}' is reversed", entry.min_qty, entry.max_qty, entry.item),
                );
            }
        }
    }
}

fn is_zone_prefix(zone: &str) -> bool {
    zone_prefix(zone) == Some(zone.trim())
}

fn check_set_drops(report: &mut Report, known: &Known, content: &LootContent) {
    for config in &content.set_drops {
        let id = config.set_id.as_str();
        check_ref!(report, known.sets, "SetDropConfig", id, "set_id", "ItemSet", id);
        if config.pieces.is_empty() {
            report.warn("SetDropConfig", id, "pieces", "no pieces, nothing can drop");
        }
        for piece in &config.pieces {
            check_ref!(report, known.items, "SetDropConfig", id, "pieces", "Item", piece);
        }
        if !is_zone_prefix(&config.zone) {
            report.warn(
                "SetDropConfig",
                id,
                "zone",
                format!("zone '{}' is not a Zone<N> prefix and matches no table", config.zone),
            );
        }
        let tiers: [(&'static str, &SetDropTier); 3] =
            [("trash", &config.trash), ("elite", &config.elite), ("boss", &config.boss)];
        for (field, tier) in tiers {
            if tier.chance_percent < 0.0 || tier.chance_percent.is_nan() {
                report.error("SetDropConfig", id, field, "negative roll chance");
            } else if tier.chance_percent > 100.0 {
                report.warn("SetDropConfig", id, field, format!("chance {}% is above 100", tier.chance_percent));
            }
        }
    }
}

fn check_chances(report: &mut Report, table_id: &str, field: &'static str, chances: &RarityChances) {
    let all = [
        chances.common,
        chances.uncommon,
        chances.magic,
        chances.rare,
        chances.epic,
        chances.legendary,
        chances.set,
        chances.radiant,
    ];
    if all.iter().any(|c| *c < 0.0 || c.is_nan()) {
        report.error("ZoneLootTable", table_id, field, "negative rarity chance");
    }
    if chances.total() > 1.0 + 1e-4 {
        report.warn(
            "ZoneLootTable",
            table_id,
            field,
            format!("chances sum to {:.3}, later rarities are unreachable", chances.total()),
        );
    }
}

fn check_zone_tables(report: &mut Report, known: &Known, content: &LootContent) {
    for table in &content.zone_tables {
        let pools = [
            ("zone_pool", &table.zone_pool),
            ("materials_pool", &table.materials_pool),
            ("boss_uniques_pool", &table.boss_uniques_pool),
        ];
        for (field, pool) in pools {
            for entry in pool {
                check_ref!(report, known.items, "ZoneLootTable", &table.id, field, "Item", &entry.item);
            }
        }
        check_chances(report, &table.id, "trash_chances", &table.trash_chances);
        check_chances(report, &table.id, "normal_chances", &table.normal_chances);
        check_chances(report, &table.id, "elite_chances", &table.elite_chances);
        check_chances(report, &table.id, "mini_boss_chances", &table.mini_boss_chances);
    }
}

fn check_drop_tables(report: &mut Report, known: &Known, content: &LootContent) {
    for table in &content.drop_tables {
        let lists = [
            ("trash_drops", &table.trash_drops),
            ("normal_drops", &table.normal_drops),
            ("elite_drops", &table.elite_drops),
            ("mini_boss_drops", &table.mini_boss_drops),
        ];
        for (field, drops) in lists {
            for entry in drops {
                check_ref!(report, known.items, "DropTable", &table.id, field, "Item", &entry.item);
                if !(0.0..=1.0).contains(&entry.chance) {
                    report.warn(
                        "DropTable",
                        &table.id,
                        field,
                        format!("chance {} for '{}' is outside 0..1", entry.chance, entry.item),
                    );
                }
            }
        }
    }
}
