//! Abyssloot - data-driven loot for an action RPG
//!
//! Item and affix definitions, weighted loot tables, rarity tuning by zone,
//! threat and enemy tier, rolled item instances and the stats they grant.

pub mod items;
pub mod loot;
pub mod data;
pub mod stats;
pub mod simulator;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::LootSettings;
pub use data::{DataManager, LootContent, LootRegistry};
pub use error::{DataError, LootError, LootResult};
pub use items::{Equipment, ItemDefinition, ItemInstance, StatTotals};
pub use loot::{
    roll_enemy_drops, roll_enemy_drops_with_pity, roll_item, roll_specific, EnemyDropContext, EnemyDrops, LootTable,
    LootTier, SetDropPity,
};
