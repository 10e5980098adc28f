//! Item sets
//!
//! Equipping several pieces of the same set unlocks bonus tiers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::StatMod;

/// Prefix for active tier keys, e.g. `SetBonus:AbyssalInitiate:2`
pub const SET_BONUS_KEY_PREFIX: &str = "SetBonus";

/// A bonus tier unlocked at a piece count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetBonusTier {
    pub required_pieces: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modifiers: Vec<StatMod>,
}

/// A named item set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSetDefinition {
    pub set_id: String,
    #[serde(default)]
    pub display_name: String,
    /// Item definition ids that belong to the set
    #[serde(default)]
    pub pieces: Vec<String>,
    #[serde(default)]
    pub bonuses: Vec<SetBonusTier>,
}

impl ItemSetDefinition {
    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.set_id
        } else {
            &self.display_name
        }
    }

    pub fn total_pieces(&self) -> usize {
        self.pieces.len()
    }

    /// Tiers unlocked with `equipped` pieces. Tiers needing zero pieces never apply.
    pub fn active_tiers(&self, equipped: u32) -> impl Iterator<Item = &SetBonusTier> {
        self.bonuses
            .iter()
            .filter(move |t| t.required_pieces > 0 && equipped >= t.required_pieces)
    }

    pub fn tier_key(&self, required_pieces: u32) -> String {
        format!("{}:{}:{}", SET_BONUS_KEY_PREFIX, self.set_id, required_pieces)
    }
}

/// Bonuses granted by the currently equipped set pieces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSetBonuses {
    pub modifiers: Vec<StatMod>,
    pub tier_keys: Vec<String>,
}

/// Collect bonuses for equipped piece counts keyed by set id
pub fn active_set_bonuses<'a>(
    counts: &BTreeMap<String, u32>,
    lookup: impl Fn(&str) -> Option<&'a ItemSetDefinition>,
) -> ActiveSetBonuses {
    let mut active = ActiveSetBonuses::default();

    for (set_id, &equipped) in counts {
        if equipped == 0 {
            continue;
        }
        let Some(set) = lookup(set_id) else {
            log::debug!("Equipped pieces reference unknown set '{}'", set_id);
            continue;
        };
        for tier in set.active_tiers(equipped) {
            active.tier_keys.push(set.tier_key(tier.required_pieces));
            active.modifiers.extend(tier.modifiers.iter().copied());
        }
    }

    active
}

/// Short summary like `+2 Melee Damage, +10 Max Health`. Percent mods are left out.
pub fn format_mods(mods: &[StatMod]) -> String {
    mods.iter()
        .filter(|m| !m.percent)
        .map(|m| {
            let v = m.value.round() as i32;
            let sign = if v >= 0 { "+" } else { "" };
            format!("{}{} {}", sign, v, m.stat.label())
        })
        .collect::<Vec<_>>()
        .join(", ")
}
