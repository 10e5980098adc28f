//! Rarity definitions
//!
//! Data-driven rarity tiers controlling affix count and base stat scaling.

use serde::{Deserialize, Serialize};

/// Rarity ids with a fixed affix count, in ascending order
pub const CANONICAL_RARITIES: [&str; 6] = ["Common", "Uncommon", "Magic", "Rare", "Epic", "Legendary"];

/// A rarity tier loaded from content data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityDefinition {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    /// Higher = rarer
    #[serde(default)]
    pub sort_order: u32,
    /// Included in generated tables by default
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Set/Unique/Mythic style tiers that never appear in normal tables
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub affix_min: i32,
    #[serde(default)]
    pub affix_max: i32,
    /// Multiplier applied to the base item's stats
    #[serde(default = "default_scalar")]
    pub scalar_min: f32,
    #[serde(default = "default_scalar")]
    pub scalar_max: f32,
}

fn default_true() -> bool {
    true
}

fn default_scalar() -> f32 {
    1.0
}

impl RarityDefinition {
    pub fn new(id: impl Into<String>, sort_order: u32) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            sort_order,
            enabled: true,
            special: false,
            affix_min: 0,
            affix_max: 0,
            scalar_min: 1.0,
            scalar_max: 1.0,
        }
    }

    pub fn with_affixes(mut self, min: i32, max: i32) -> Self {
        self.affix_min = min;
        self.affix_max = max;
        self
    }

    pub fn with_scalar(mut self, min: f32, max: f32) -> Self {
        self.scalar_min = min;
        self.scalar_max = max;
        self
    }

    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    /// Affix count range with both ends non-negative and max >= min
    pub fn affix_range(&self) -> (u32, u32) {
        let min = self.affix_min.max(0) as u32;
        let max = (self.affix_max.max(0) as u32).max(min);
        (min, max)
    }

    /// Scalar range with both ends non-negative
    pub fn scalar_range(&self) -> (f32, f32) {
        (self.scalar_min.max(0.0), self.scalar_max.max(0.0))
    }

    /// Clamp authored values in place
    pub fn normalize(&mut self) {
        let (min, max) = self.affix_range();
        self.affix_min = min as i32;
        self.affix_max = max as i32;
        let (smin, smax) = self.scalar_range();
        self.scalar_min = smin;
        self.scalar_max = smax;
    }

    /// Fixed affix count for the canonical rarity ids, if this is one
    pub fn fixed_affix_count(&self) -> Option<u32> {
        fixed_affix_count(&self.id)
    }

    /// Display color RGB
    pub fn color(&self) -> (u8, u8, u8) {
        rarity_color(&self.id).unwrap_or((255, 255, 255))
    }
}

/// Deterministic affix count for canonical rarity ids (case-insensitive)
pub fn fixed_affix_count(rarity_id: &str) -> Option<u32> {
    match rarity_id.trim().to_ascii_lowercase().as_str() {
        "common" => Some(0),
        "uncommon" => Some(0),
        "magic" => Some(1),
        "rare" => Some(2),
        "epic" => Some(3),
        "legendary" => Some(4),
        _ => None,
    }
}

/// UI color for a rarity id
pub fn rarity_color(rarity_id: &str) -> Option<(u8, u8, u8)> {
    match rarity_id.trim().to_ascii_lowercase().as_str() {
        "common" => Some((158, 158, 158)),
        "uncommon" => Some((51, 179, 64)),
        "magic" => Some((56, 133, 242)),
        "rare" => Some((217, 191, 46)),   // Yellow, distinct from Magic blue
        "epic" => Some((168, 71, 217)),
        "legendary" => Some((242, 140, 26)),
        "set" => Some((230, 77, 77)),
        "radiant" => Some((230, 217, 77)),
        _ => None,
    }
}

/// Hex form of a color, e.g. `D9BF2E`
pub fn color_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("{:02X}{:02X}{:02X}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affix_range_is_clamped() {
        let r = RarityDefinition::new("Odd", 3).with_affixes(-2, -5);
        assert_eq!(r.affix_range(), (0, 0));

        let r = RarityDefinition::new("Odd", 3).with_affixes(3, 1);
        assert_eq!(r.affix_range(), (3, 3));

        let mut r = RarityDefinition::new("Odd", 3).with_affixes(-1, 4).with_scalar(-1.0, 2.0);
        r.normalize();
        assert_eq!((r.affix_min, r.affix_max), (0, 4));
        assert_eq!(r.scalar_min, 0.0);
    }

    #[test]
    fn test_fixed_affix_counts() {
        assert_eq!(fixed_affix_count("common"), Some(0));
        assert_eq!(fixed_affix_count("Uncommon"), Some(0));
        assert_eq!(fixed_affix_count("MAGIC"), Some(1));
        assert_eq!(fixed_affix_count("Legendary"), Some(4));
        assert_eq!(fixed_affix_count("Mythic"), None);
    }

    #[test]
    fn test_colors() {
        assert_eq!(color_hex((217, 191, 46)), "D9BF2E");
        assert!(rarity_color("mythic").is_none());
        assert_eq!(RarityDefinition::new("Mythic", 8).color(), (255, 255, 255));
    }
}
