//! Abyssloot - Entry Point
//!
//! Command line front end for rolling, simulating and validating loot content.
//!
//! Usage:
//!   abyssloot [--data DIR] <command> [OPTIONS]
//!
//! Commands:
//!   roll <table>              Roll one item
//!   simulate <table>          Roll many items and report the distribution
//!   drop <table>              Roll the full drops for one enemy death
//!   zone <table>              Roll a zone or legacy drop table for an enemy tier
//!   validate                  Check content references and ranges
//!   export-defaults [dir]     Write the starter content as RON files

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use abyssloot::config::{settings_path, LootSettings};
use abyssloot::data::{export_default_data, validate, DataManager, LootRegistry, Severity};
use abyssloot::loot::{
    apply_boss_overrides, roll_enemy_drops_with_pity, roll_item, roll_zone, EnemyDropContext, EnemyTier, LootTier,
    SetDropPity,
};
use abyssloot::simulator::simulate_table;

const DEFAULT_SIM_COUNT: u32 = 200;

// ── CLI ──────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Command {
    Roll { table: String, ilvl: u32, seed: Option<u64>, json: bool },
    Simulate { table: String, count: u32, ilvl: u32, seed: Option<u64>, json: bool },
    Drop {
        table: String,
        threat: f32,
        distance: Option<f32>,
        kills: u32,
        loot_tier: i32,
        label: LootTier,
        ilvl: Option<u32>,
        seed: Option<u64>,
        json: bool,
    },
    Zone { table: String, tier: EnemyTier, boss: bool, seed: Option<u64>, json: bool },
    Validate,
    ExportDefaults { dir: Option<PathBuf> },
    Help,
    Version,
}

#[derive(Debug)]
struct Cli {
    data_dir: Option<PathBuf>,
    command: Command,
}

/// Pulls values for flags off the argument list
struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos).cloned();
        self.pos += 1;
        arg
    }

    fn value(&mut self, flag: &str) -> Result<String> {
        match self.next() {
            Some(v) => Ok(v),
            None => bail!("{} requires a value", flag),
        }
    }

    fn parsed<T: std::str::FromStr>(&mut self, flag: &str) -> Result<T>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.value(flag)?;
        raw.parse().with_context(|| format!("invalid value '{}' for {}", raw, flag))
    }
}

fn parse_args(args: Vec<String>) -> Result<Cli> {
    let mut args = Args { args, pos: 1 };
    let mut data_dir = None;

    let name = loop {
        match args.next() {
            Some(a) if a == "--data" => data_dir = Some(PathBuf::from(args.value("--data")?)),
            Some(a) if a == "--help" || a == "-h" => return Ok(Cli { data_dir, command: Command::Help }),
            Some(a) if a == "--version" || a == "-V" => return Ok(Cli { data_dir, command: Command::Version }),
            Some(a) => break a,
            None => return Ok(Cli { data_dir, command: Command::Help }),
        }
    };

    let mut positional: Vec<String> = Vec::new();
    let mut ilvl = None;
    let mut seed = None;
    let mut json = false;
    let mut count = DEFAULT_SIM_COUNT;
    let mut threat = 0.0;
    let mut distance = None;
    let mut kills = 1;
    let mut loot_tier = 1;
    let mut label = None;
    let mut tier = EnemyTier::Normal;
    let mut boss = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ilvl" => ilvl = Some(args.parsed("--ilvl")?),
            "--seed" => seed = Some(args.parsed("--seed")?),
            "--json" => json = true,
            "--count" => count = args.parsed("--count")?,
            "--threat" => threat = args.parsed("--threat")?,
            "--distance" => distance = Some(args.parsed("--distance")?),
            "--kills" => kills = args.parsed("--kills")?,
            "--loot-tier" => loot_tier = args.parsed("--loot-tier")?,
            "--label" => label = Some(LootTier::from_label(&args.value("--label")?)),
            "--tier" => {
                let raw = args.value("--tier")?;
                tier = EnemyTier::from_label(&raw).with_context(|| format!("unknown enemy tier '{}'", raw))?;
            }
            "--boss" => boss = true,
            "--data" => data_dir = Some(PathBuf::from(args.value("--data")?)),
            "--help" | "-h" => return Ok(Cli { data_dir, command: Command::Help }),
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            _ => positional.push(arg),
        }
    }

    let table = |positional: &[String]| -> Result<String> {
        match positional.first() {
            Some(t) => Ok(t.clone()),
            None => bail!("'{}' needs a table id", name),
        }
    };

    let command = match name.as_str() {
        "roll" => Command::Roll { table: table(&positional)?, ilvl: ilvl.unwrap_or(1), seed, json },
        "simulate" => Command::Simulate { table: table(&positional)?, count, ilvl: ilvl.unwrap_or(1), seed, json },
        "drop" => {
            let table = table(&positional)?;
            let label = label.unwrap_or_else(|| LootTier::from_table_id(&table));
            Command::Drop { table, threat, distance, kills: kills.max(1), loot_tier, label, ilvl, seed, json }
        }
        "zone" => Command::Zone { table: table(&positional)?, tier, boss, seed, json },
        "validate" => Command::Validate,
        "export-defaults" => Command::ExportDefaults { dir: positional.first().map(PathBuf::from) },
        "help" => Command::Help,
        other => bail!("unknown command '{}'", other),
    };

    Ok(Cli { data_dir, command })
}

fn print_usage() {
    println!(
        "abyssloot {}\n\
         \n\
         Usage: abyssloot [--data DIR] <command> [OPTIONS]\n\
         \n\
         Commands:\n\
         \x20 roll <table> [--ilvl N] [--seed N] [--json]\n\
         \x20 simulate <table> [--count N] [--ilvl N] [--seed N] [--json]\n\
         \x20 drop <table> [--threat X | --distance M] [--kills N] [--loot-tier N]\n\
         \x20      [--label trash|elite|boss] [--ilvl N] [--seed N] [--json]\n\
         \x20 zone <table> [--tier trash|normal|elite|miniboss] [--boss] [--seed N] [--json]\n\
         \x20 validate\n\
         \x20 export-defaults [dir]\n\
         \n\
         Options:\n\
         \x20 --data DIR      Content directory (overrides ABYSSLOOT_DATA and settings)\n\
         \x20 --help, -h      Show this help\n\
         \x20 --version, -V   Show version\n\
         \n\
         Settings are read from {}",
        env!("CARGO_PKG_VERSION"),
        settings_path().display()
    );
}

// ── Commands ─────────────────────────────────────────────────────────

fn make_rng(seed: Option<u64>, settings: &LootSettings) -> (StdRng, u64) {
    let seed = seed.or(settings.seed).unwrap_or_else(|| rand::thread_rng().gen());
    (StdRng::seed_from_u64(seed), seed)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("failed to encode JSON")?);
    Ok(())
}

fn run(cli: Cli, settings: &LootSettings) -> Result<()> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| settings.resolve_data_dir());
    let load = || DataManager::load(&data_dir);

    match cli.command {
        Command::Help => print_usage(),
        Command::Version => println!("abyssloot {}", env!("CARGO_PKG_VERSION")),

        Command::Roll { table, ilvl, seed, json } => {
            let mut registry = load().into_registry();
            let (mut rng, seed) = make_rng(seed, settings);
            let loot_table = registry.require_table(&table)?.clone();
            let ilvl = settings.item_level(ilvl);

            let Some(inst) = roll_item(&registry, &loot_table, ilvl, None, &mut rng) else {
                bail!("table '{}' produced nothing", loot_table.id);
            };
            if settings.log_creation {
                let id = registry.register_rolled_instance(inst.clone(), None);
                log::info!("Rolled {} ({}) from '{}'", id, inst.display_name(&registry), loot_table.id);
            }

            if json {
                print_json(&inst)?;
            } else {
                println!("seed {}", seed);
                println!("{}", inst.tooltip(&registry));
            }
        }

        Command::Simulate { table, count, ilvl, seed, json } => {
            let registry = load().into_registry();
            let (mut rng, seed) = make_rng(seed, settings);
            let report = simulate_table(&registry, &table, count, settings.item_level(ilvl), &mut rng)?;
            if json {
                print_json(&report)?;
            } else {
                println!("seed {}", seed);
                for line in report.summary_lines() {
                    println!("{}", line);
                }
            }
        }

        Command::Drop { table, threat, distance, kills, loot_tier, label, ilvl, seed, json } => {
            let registry = load().into_registry();
            let (mut rng, seed) = make_rng(seed, settings);
            let threat = drop_threat(&registry, threat, distance);
            let ctx = EnemyDropContext {
                threat,
                loot_tier,
                label,
                item_level_override: settings.item_level_override.or(ilvl),
                ..EnemyDropContext::new(table)
            };

            let mut pity = SetDropPity::new();
            let mut all = Vec::with_capacity(kills as usize);
            for _ in 0..kills {
                all.push(roll_enemy_drops_with_pity(&registry, &ctx, &mut pity, &mut rng)?);
            }

            if json {
                match all.as_slice() {
                    [single] => print_json(single)?,
                    many => print_json(&many)?,
                }
            } else {
                println!("seed {}", seed);
                for (kill, drops) in all.iter().enumerate() {
                    if kills > 1 {
                        print!("kill {}: ", kill + 1);
                    }
                    println!("{} drop(s) from '{}' ({} / threat {:.1})", drops.count(), ctx.table_id, label, threat);
                    for inst in drops.all() {
                        println!("- {} [{}] ilvl {}", inst.display_name(&registry), inst.rarity_id, inst.item_level);
                    }
                }
            }
        }

        Command::Zone { table, tier, boss, seed, json } => {
            let registry = load().into_registry();
            let (mut rng, seed) = make_rng(seed, settings);
            zone_command(&registry, &table, tier, boss, json, seed, &mut rng)?;
        }

        Command::Validate => {
            let manager = load();
            let issues = validate(manager.content());
            for issue in &issues {
                println!("{}", issue);
            }
            let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
            println!(
                "{}: {} error(s), {} warning(s)",
                manager.base_path().display(),
                errors,
                issues.len() - errors
            );
            if errors > 0 {
                bail!("content has {} error(s)", errors);
            }
        }

        Command::ExportDefaults { dir } => {
            let dir = dir.unwrap_or_else(|| data_dir.clone());
            let written = export_default_data(&dir)?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Threat from a distance when one is given, using the loaded distance steps
fn drop_threat(registry: &LootRegistry, threat: f32, distance: Option<f32>) -> f32 {
    match distance {
        Some(meters) => registry.threat_distance().evaluate_threat(meters),
        None => threat,
    }
}

/// Zone tables take precedence; legacy drop tables are tried second
fn zone_command(
    registry: &LootRegistry,
    table: &str,
    tier: EnemyTier,
    boss: bool,
    json: bool,
    seed: u64,
    rng: &mut StdRng,
) -> Result<()> {
    let rolled: Vec<(String, String)> = if let Some(zone) = registry.zone_table(table) {
        let mut results = roll_zone(zone, tier, rng);
        if boss {
            apply_boss_overrides(zone, &mut results, rng);
        }
        results.into_iter().map(|e| (e.item, e.rarity.to_string())).collect()
    } else if let Some(legacy) = registry.drop_table(table) {
        legacy
            .roll(tier, rng)
            .into_iter()
            .map(|e| (e.item, e.rarity.to_string()))
            .collect()
    } else {
        bail!("no zone or drop table named '{}'", table);
    };

    if json {
        return print_json(&rolled);
    }
    println!("seed {}", seed);
    if rolled.is_empty() {
        println!("nothing dropped");
    }
    for (item, rarity) in &rolled {
        let name = registry.item(item).map(|d| d.name().to_string()).unwrap_or_else(|| item.clone());
        println!("- {} [{}]", name, rarity);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = parse_args(std::env::args().collect())?;
    if matches!(cli.command, Command::Help | Command::Version) {
        return run(cli, &LootSettings::default());
    }

    let settings = LootSettings::load_default();
    log::debug!("Starting abyssloot v{}", env!("CARGO_PKG_VERSION"));
    run(cli, &settings)
}
