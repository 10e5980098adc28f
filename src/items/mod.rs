//! Item system

pub mod item;
pub mod rarity;
pub mod affix;
pub mod instance;
pub mod equipment;
pub mod sets;

pub use item::{ItemDefinition, StatType, StatMod, EquipSlot, AffixTag, tags_intersect};
pub use rarity::{RarityDefinition, fixed_affix_count, rarity_color, CANONICAL_RARITIES};
pub use affix::{AffixDefinition, AffixTier, AffixPool};
pub use instance::{ItemInstance, AffixRoll, StatTotals};
pub use equipment::Equipment;
pub use sets::{ItemSetDefinition, SetBonusTier, ActiveSetBonuses, active_set_bonuses, format_mods};
