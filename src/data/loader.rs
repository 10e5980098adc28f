//! RON data loader
//!
//! Loads loot content from RON files in a data directory, with fallback to
//! the built-in starter content for any file that is missing or broken.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::content::{LootContent, ThreatSettings};
use super::defaults;
use super::registry::LootRegistry;
use crate::error::DataError;

pub const ITEMS_FILE: &str = "items.ron";
pub const RARITIES_FILE: &str = "rarities.ron";
pub const AFFIXES_FILE: &str = "affixes.ron";
pub const AFFIX_POOLS_FILE: &str = "affix_pools.ron";
pub const TABLES_FILE: &str = "tables.ron";
pub const SETS_FILE: &str = "sets.ron";
pub const ZONE_TUNING_FILE: &str = "zone_tuning.ron";
pub const THREAT_FILE: &str = "threat.ron";
pub const TIER_LOOT_FILE: &str = "tier_loot.ron";
pub const DROP_BONUS_FILE: &str = "drop_bonus.ron";
pub const ZONE_TABLES_FILE: &str = "zone_tables.ron";
pub const DROP_TABLES_FILE: &str = "drop_tables.ron";
pub const SET_DROPS_FILE: &str = "set_drops.ron";

/// Manages all external loot data
#[derive(Debug, Clone)]
pub struct DataManager {
    base_path: PathBuf,
    content: LootContent,
}

impl DataManager {
    /// Load every file under `base_path`, falling back per file
    pub fn load(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let content = Self::load_content(&base_path);
        log::info!("Loaded loot content from {}", base_path.display());
        Self { base_path, content }
    }

    fn load_content(base: &Path) -> LootContent {
        LootContent {
            items: load_file(base, ITEMS_FILE, defaults::default_items),
            rarities: load_file(base, RARITIES_FILE, defaults::default_rarities),
            affixes: load_file(base, AFFIXES_FILE, defaults::default_affixes),
            affix_pools: load_file(base, AFFIX_POOLS_FILE, defaults::default_affix_pools),
            tables: load_file(base, TABLES_FILE, defaults::default_tables),
            sets: load_file(base, SETS_FILE, defaults::default_sets),
            zone_tunings: load_file(base, ZONE_TUNING_FILE, || vec![defaults::zone1_tuning()]),
            threat: load_file(base, THREAT_FILE, || ThreatSettings {
                distance: Default::default(),
                scaling: Some(defaults::default_threat_scaling()),
            }),
            tier_loot: load_file(base, TIER_LOOT_FILE, || Some(defaults::default_tier_loot())),
            drop_bonus: load_file(base, DROP_BONUS_FILE, Default::default),
            set_drops: load_file(base, SET_DROPS_FILE, || vec![defaults::zone1_set_drops()]),
            zone_tables: load_file(base, ZONE_TABLES_FILE, || vec![defaults::zone1_zone_table()]),
            drop_tables: load_file(base, DROP_TABLES_FILE, || vec![defaults::zone1_legacy_drop_table()]),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn content(&self) -> &LootContent {
        &self.content
    }

    /// Build the lookup registry
    pub fn registry(&self) -> LootRegistry {
        LootRegistry::from_content(self.content.clone())
    }

    pub fn into_registry(self) -> LootRegistry {
        LootRegistry::from_content(self.content)
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets/data"),
            content: defaults::starter_content(),
        }
    }
}

/// Parse one RON file, or use `fallback` when it is missing or invalid
fn load_file<T: DeserializeOwned>(base: &Path, name: &str, fallback: impl FnOnce() -> T) -> T {
    let path = base.join(name);
    if !path.exists() {
        log::debug!("{} not found, using defaults", path.display());
        return fallback();
    }
    match read_ron(&path) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            fallback()
        }
    }
}

/// Read and parse a RON file
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let text = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_ron<T: Serialize>(dir: &Path, name: &'static str, value: &T) -> Result<(), DataError> {
    let config = ron::ser::PrettyConfig::new().depth_limit(6).indentor("    ".to_string());
    let text = ron::ser::to_string_pretty(value, config)
        .map_err(|source| DataError::Serialize { what: name, source })?;
    let path = dir.join(name);
    fs::write(&path, text).map_err(|source| DataError::Write { path, source })
}

/// Write the starter content as data files into `dir`, creating it if needed
pub fn export_default_data(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    fs::create_dir_all(dir).map_err(|source| DataError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let c = defaults::starter_content();
    write_ron(dir, ITEMS_FILE, &c.items)?;
    write_ron(dir, RARITIES_FILE, &c.rarities)?;
    write_ron(dir, AFFIXES_FILE, &c.affixes)?;
    write_ron(dir, AFFIX_POOLS_FILE, &c.affix_pools)?;
    write_ron(dir, TABLES_FILE, &c.tables)?;
    write_ron(dir, SETS_FILE, &c.sets)?;
    write_ron(dir, ZONE_TUNING_FILE, &c.zone_tunings)?;
    write_ron(dir, THREAT_FILE, &c.threat)?;
    write_ron(dir, TIER_LOOT_FILE, &c.tier_loot)?;
    write_ron(dir, DROP_BONUS_FILE, &c.drop_bonus)?;
    write_ron(dir, SET_DROPS_FILE, &c.set_drops)?;
    write_ron(dir, ZONE_TABLES_FILE, &c.zone_tables)?;
    write_ron(dir, DROP_TABLES_FILE, &c.drop_tables)?;

    let written: Vec<PathBuf> = [
        ITEMS_FILE,
        RARITIES_FILE,
        AFFIXES_FILE,
        AFFIX_POOLS_FILE,
        TABLES_FILE,
        SETS_FILE,
        ZONE_TUNING_FILE,
        THREAT_FILE,
        TIER_LOOT_FILE,
        DROP_BONUS_FILE,
        SET_DROPS_FILE,
        ZONE_TABLES_FILE,
        DROP_TABLES_FILE,
    ]
    .iter()
    .map(|name| dir.join(name))
    .collect();

    log::info!("Exported {} data files to {}", written.len(), dir.display());
    Ok(written)
}
