//! Item definitions
//!
//! Base item templates, stat types, equipment slots and affix tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stats an item or affix can modify.
///
/// New entries go at the end; content files refer to these by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatType {
    MeleeDamage,
    RangedDamage,
    MagicDamage,

    Defense,
    MaxHealth,
    AttackSpeed,
    MoveSpeed,

    Attack,
    Strength,
    DefenseSkill,
    RangedSkill,
    MagicSkill,
    MeleeSkill,

    // Skilling
    Alchemy,
    Mining,
    Woodcutting,
    Forging,
    Fishing,
    Cooking,
}

impl StatType {
    /// Primary combat stats in display order
    pub const PRIMARY_COMBAT: [StatType; 5] = [
        StatType::Attack,
        StatType::Strength,
        StatType::DefenseSkill,
        StatType::RangedSkill,
        StatType::MagicSkill,
    ];

    /// Primary skilling stats in display order
    pub const PRIMARY_SKILLING: [StatType; 6] = [
        StatType::Alchemy,
        StatType::Mining,
        StatType::Woodcutting,
        StatType::Forging,
        StatType::Fishing,
        StatType::Cooking,
    ];

    /// Human readable label used in tooltips and stat lines
    pub fn label(&self) -> &'static str {
        match self {
            StatType::MeleeDamage => "Melee Damage",
            StatType::RangedDamage => "Ranged Damage",
            StatType::MagicDamage => "Magic Damage",
            StatType::Defense => "Defense",
            StatType::MaxHealth => "Max Health",
            StatType::AttackSpeed => "Attack Speed",
            StatType::MoveSpeed => "Move Speed",
            StatType::Attack => "Attack",
            StatType::Strength => "Strength",
            StatType::DefenseSkill => "Defense Skill",
            StatType::RangedSkill => "Ranged Skill",
            StatType::MagicSkill => "Magic Skill",
            StatType::MeleeSkill => "Melee Skill",
            StatType::Alchemy => "Alchemy",
            StatType::Mining => "Mining",
            StatType::Woodcutting => "Woodcutting",
            StatType::Forging => "Forging",
            StatType::Fishing => "Fishing",
            StatType::Cooking => "Cooking",
        }
    }

    /// Canonical name for primary stats ("Defence", "Ranged", ...).
    /// Non-primary stats use their label.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            StatType::DefenseSkill => "Defence",
            StatType::RangedSkill => "Ranged",
            StatType::MagicSkill => "Magic",
            other => other.label(),
        }
    }

    /// Parse a canonical primary stat name. Accepts both spellings of Defence.
    pub fn from_canonical_name(name: &str) -> Option<StatType> {
        match name.trim() {
            "Attack" => Some(StatType::Attack),
            "Strength" => Some(StatType::Strength),
            "Defence" | "Defense" => Some(StatType::DefenseSkill),
            "Ranged" => Some(StatType::RangedSkill),
            "Magic" => Some(StatType::MagicSkill),
            "Alchemy" => Some(StatType::Alchemy),
            "Mining" => Some(StatType::Mining),
            "Woodcutting" => Some(StatType::Woodcutting),
            "Forging" => Some(StatType::Forging),
            "Fishing" => Some(StatType::Fishing),
            "Cooking" => Some(StatType::Cooking),
            _ => None,
        }
    }

    /// Whether this stat contributes to outgoing damage
    pub fn is_damage(&self) -> bool {
        matches!(self, StatType::MeleeDamage | StatType::RangedDamage | StatType::MagicDamage)
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Equipment slot an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EquipSlot {
    #[default]
    None,
    Helm,
    Chest,
    Legs,
    Belt,
    Gloves,
    Boots,
    Cape,
    Ammo,
    LeftHand,
    RightHand,
    Ring1,
    Ring2,
    Amulet,
    Artifact,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::None => "None",
            EquipSlot::Helm => "Helm",
            EquipSlot::Chest => "Chest",
            EquipSlot::Legs => "Legs",
            EquipSlot::Belt => "Belt",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Boots => "Boots",
            EquipSlot::Cape => "Cape",
            EquipSlot::Ammo => "Ammo",
            EquipSlot::LeftHand => "Left Hand",
            EquipSlot::RightHand => "Right Hand",
            EquipSlot::Ring1 => "Ring 1",
            EquipSlot::Ring2 => "Ring 2",
            EquipSlot::Amulet => "Amulet",
            EquipSlot::Artifact => "Artifact",
        }
    }

    /// All wearable slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Helm,
            EquipSlot::Chest,
            EquipSlot::Legs,
            EquipSlot::Belt,
            EquipSlot::Gloves,
            EquipSlot::Boots,
            EquipSlot::Cape,
            EquipSlot::Ammo,
            EquipSlot::LeftHand,
            EquipSlot::RightHand,
            EquipSlot::Ring1,
            EquipSlot::Ring2,
            EquipSlot::Amulet,
            EquipSlot::Artifact,
        ]
    }

    pub fn is_hand(&self) -> bool {
        matches!(self, EquipSlot::LeftHand | EquipSlot::RightHand)
    }
}

/// Tags that decide which affixes an item may roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffixTag {
    /// Matches every tag
    Any,
    WeaponMelee,
    WeaponRanged,
    WeaponMagic,
    Armor,
    Jewelry,
}

/// Check whether an item's tags and an affix's tags overlap.
///
/// An empty list on either side, or `Any` on either side, matches everything.
pub fn tags_intersect(item_tags: &[AffixTag], affix_tags: &[AffixTag]) -> bool {
    if item_tags.is_empty() || affix_tags.is_empty() {
        return true;
    }
    if affix_tags.contains(&AffixTag::Any) {
        return true;
    }
    item_tags
        .iter()
        .any(|t| *t == AffixTag::Any || affix_tags.contains(t))
}

/// A single numeric stat modifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatMod {
    pub stat: StatType,
    pub value: f32,
    #[serde(default)]
    pub percent: bool,
}

impl StatMod {
    pub fn flat(stat: StatType, value: f32) -> Self {
        Self { stat, value, percent: false }
    }

    pub fn percent(stat: StatType, value: f32) -> Self {
        Self { stat, value, percent: true }
    }

    /// Tooltip line, e.g. `+3 Melee Damage` or `+12% Move Speed`
    pub fn stat_line(&self) -> String {
        let sign = if self.value >= 0.0 { "+" } else { "" };
        if self.percent {
            format!("{}{}% {}", sign, format_value(self.value), self.stat.label())
        } else {
            format!("{}{} {}", sign, format_value(self.value), self.stat.label())
        }
    }
}

/// Format a rolled value: whole numbers without decimals, fractions with two
pub fn format_value(value: f32) -> String {
    if (value - value.round()).abs() < 0.005 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Base item template loaded from content data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique template ID (case-insensitive)
    pub id: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Description/flavor text
    #[serde(default)]
    pub description: String,
    /// Primary equipment slot
    #[serde(default)]
    pub slot: EquipSlot,
    /// Slots occupied when equipped; empty means just `slot`
    #[serde(default)]
    pub occupies_slots: Vec<EquipSlot>,
    /// Stat modifiers before rarity scaling
    #[serde(default)]
    pub base_stats: Vec<StatMod>,
    /// Which affix families this item may roll
    #[serde(default)]
    pub allowed_affix_tags: Vec<AffixTag>,
    /// Optional item set membership
    #[serde(default)]
    pub set_id: Option<String>,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub untradeable: bool,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, slot: EquipSlot) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            slot,
            occupies_slots: Vec::new(),
            base_stats: Vec::new(),
            allowed_affix_tags: Vec::new(),
            set_id: None,
            stackable: false,
            untradeable: false,
        }
    }

    pub fn with_stat(mut self, stat: StatMod) -> Self {
        self.base_stats.push(stat);
        self
    }

    pub fn with_tags(mut self, tags: &[AffixTag]) -> Self {
        self.allowed_affix_tags.extend_from_slice(tags);
        self
    }

    /// Mark as occupying both hands
    pub fn two_handed(mut self) -> Self {
        self.occupies_slots = vec![EquipSlot::RightHand, EquipSlot::LeftHand];
        self
    }

    /// Name to show, falling back to the id
    pub fn name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }

    /// Slots this item fills when equipped
    pub fn occupied_slots(&self) -> Vec<EquipSlot> {
        if self.occupies_slots.is_empty() {
            vec![self.slot]
        } else {
            self.occupies_slots.clone()
        }
    }

    pub fn is_two_handed(&self) -> bool {
        self.occupies_slots.contains(&EquipSlot::LeftHand)
            && self.occupies_slots.contains(&EquipSlot::RightHand)
    }

    pub fn has_tag(&self, tag: AffixTag) -> bool {
        self.allowed_affix_tags.contains(&tag)
    }

    pub fn is_equippable(&self) -> bool {
        self.slot != EquipSlot::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_intersection() {
        use AffixTag::*;
        assert!(tags_intersect(&[WeaponMelee], &[WeaponMelee, WeaponRanged]));
        assert!(!tags_intersect(&[Armor], &[WeaponMelee]));
        assert!(tags_intersect(&[Armor], &[Any]));
        assert!(tags_intersect(&[Any], &[WeaponMagic]));
        assert!(tags_intersect(&[], &[WeaponMagic]));
        assert!(tags_intersect(&[Jewelry], &[]));
    }

    #[test]
    fn test_stat_line() {
        assert_eq!(StatMod::flat(StatType::MeleeDamage, 3.0).stat_line(), "+3 Melee Damage");
        assert_eq!(StatMod::percent(StatType::MoveSpeed, 0.25).stat_line(), "+0.25% Move Speed");
        assert_eq!(StatMod::flat(StatType::Defense, -2.0).stat_line(), "-2 Defense");
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(StatType::from_canonical_name("Defence"), Some(StatType::DefenseSkill));
        assert_eq!(StatType::from_canonical_name(" Defense "), Some(StatType::DefenseSkill));
        assert_eq!(StatType::from_canonical_name("Sailing"), None);
        assert_eq!(StatType::RangedSkill.canonical_name(), "Ranged");
        assert_eq!(StatType::MaxHealth.canonical_name(), "Max Health");
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let item = ItemDefinition::new("Starter_Sword", "", EquipSlot::RightHand);
        assert_eq!(item.name(), "Starter_Sword");
        assert_eq!(item.occupied_slots(), vec![EquipSlot::RightHand]);
        assert!(item.clone().two_handed().is_two_handed());
    }
}
