//! Threat
//!
//! Distance from the zone entrance becomes a threat value, and threat
//! shifts rarity weights and grants bonus rolls.

use serde::{Deserialize, Serialize};

use super::tuning::RarityWeights;

const MIN_STEP: f32 = 0.0001;

/// Convert a distance to threat, rounded to `step` and clamped to `[0, max_threat]`
pub fn quantize_clamp_threat(distance: f32, meters_per_threat: f32, step: f32, max_threat: f32) -> f32 {
    let meters_per_threat = meters_per_threat.max(MIN_STEP);
    let step = step.max(MIN_STEP);
    let max_threat = max_threat.max(0.0);

    let raw = distance / meters_per_threat;
    let quantized = (raw / step).round_ties_even() * step;
    quantized.clamp(0.0, max_threat)
}

/// Step index of a threat value, in `[0, round(max_threat / step)]`
pub fn threat_to_step_index(threat: f32, step: f32, max_threat: f32) -> u32 {
    let step = step.max(MIN_STEP);
    let max_threat = max_threat.max(0.0);

    let max_index = (max_threat / step).round_ties_even() as i64;
    let idx = (threat.clamp(0.0, max_threat) / step).round_ties_even() as i64;
    idx.clamp(0, max_index.max(0)) as u32
}

/// Distance thresholds, one per threat step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatDistanceConfig {
    pub step: f32,
    /// Ascending meters at which each step is reached
    pub meters_thresholds: Vec<f32>,
}

impl Default for ThreatDistanceConfig {
    fn default() -> Self {
        Self {
            step: 0.5,
            meters_thresholds: (1..=10).map(|i| i as f32 * 25.0).collect(),
        }
    }
}

impl ThreatDistanceConfig {
    fn step(&self) -> f32 {
        self.step.max(0.01)
    }

    pub fn step_count(&self) -> usize {
        self.meters_thresholds.len()
    }

    pub fn max_threat(&self) -> f32 {
        self.step_count() as f32 * self.step()
    }

    /// Threat at a distance: one step per threshold reached
    pub fn evaluate_threat(&self, distance: f32) -> f32 {
        let step = self.step();
        let reached = self
            .meters_thresholds
            .iter()
            .take_while(|&&m| distance >= m)
            .count();
        (reached as f32 * step).clamp(0.0, self.max_threat())
    }

    pub fn evaluate_step_index(&self, distance: f32) -> usize {
        let idx = (self.evaluate_threat(distance) / self.step()).round_ties_even() as usize;
        idx.min(self.step_count())
    }

    /// Clamp thresholds non-negative and sort them
    pub fn normalize(&mut self) {
        self.step = self.step();
        for m in &mut self.meters_thresholds {
            *m = m.max(0.0);
        }
        self.meters_thresholds.sort_by(|a, b| a.total_cmp(b));
    }
}

/// Multipliers and bonus rolls from a threat level upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatLootTier {
    pub min_threat: f32,
    pub common: f32,
    pub uncommon: f32,
    pub magic: f32,
    pub rare: f32,
    pub epic: f32,
    pub legendary: f32,
    #[serde(default)]
    pub bonus_rolls: u32,
    #[serde(default)]
    pub bonus_roll_chance: f32,
}

impl ThreatLootTier {
    /// A tier that leaves weights unchanged
    pub fn neutral(min_threat: f32) -> Self {
        Self {
            min_threat,
            common: 1.0,
            uncommon: 1.0,
            magic: 1.0,
            rare: 1.0,
            epic: 1.0,
            legendary: 1.0,
            bonus_rolls: 0,
            bonus_roll_chance: 0.0,
        }
    }
}

/// Result of applying threat scaling
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreatBonus {
    pub bonus_rolls: u32,
    pub bonus_roll_chance: f32,
}

/// Threat tiers; the highest `min_threat` not above the current threat wins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatLootScaling {
    pub tiers: Vec<ThreatLootTier>,
}

impl ThreatLootScaling {
    pub fn tier_for(&self, threat: f32) -> Option<&ThreatLootTier> {
        let mut best: Option<&ThreatLootTier> = None;
        for tier in &self.tiers {
            if threat < tier.min_threat {
                continue;
            }
            if best.map_or(true, |b| tier.min_threat > b.min_threat) {
                best = Some(tier);
            }
        }
        best
    }

    /// Scale weights for the threat level and report bonus rolls
    pub fn apply(&self, threat: f32, weights: &mut RarityWeights) -> ThreatBonus {
        let Some(tier) = self.tier_for(threat) else {
            return ThreatBonus::default();
        };

        weights.common = (weights.common * tier.common).max(0.0);
        weights.uncommon = (weights.uncommon * tier.uncommon).max(0.0);
        weights.magic = (weights.magic * tier.magic).max(0.0);
        weights.rare = (weights.rare * tier.rare).max(0.0);
        weights.epic = (weights.epic * tier.epic).max(0.0);
        weights.legendary = (weights.legendary * tier.legendary).max(0.0);

        ThreatBonus {
            bonus_rolls: tier.bonus_rolls,
            bonus_roll_chance: tier.bonus_roll_chance.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_clamp() {
        assert_eq!(quantize_clamp_threat(120.0, 50.0, 0.5, 10.0), 2.5);
        assert_eq!(quantize_clamp_threat(-30.0, 50.0, 0.5, 10.0), 0.0);
        assert_eq!(quantize_clamp_threat(5000.0, 50.0, 0.5, 3.0), 3.0);
    }

    #[test]
    fn test_step_index() {
        assert_eq!(threat_to_step_index(2.5, 0.5, 5.0), 5);
        assert_eq!(threat_to_step_index(99.0, 0.5, 5.0), 10);
        assert_eq!(threat_to_step_index(-1.0, 0.5, 5.0), 0);
    }

    #[test]
    fn test_half_steps_round_to_even() {
        assert_eq!(quantize_clamp_threat(25.0, 10.0, 1.0, 10.0), 2.0);
        assert_eq!(quantize_clamp_threat(35.0, 10.0, 1.0, 10.0), 4.0);
        assert_eq!(quantize_clamp_threat(5.0, 10.0, 1.0, 10.0), 0.0);
        assert_eq!(threat_to_step_index(2.5, 1.0, 10.0), 2);
        assert_eq!(threat_to_step_index(3.5, 1.0, 10.0), 4);
    }

    #[test]
    fn test_distance_config() {
        let cfg = ThreatDistanceConfig::default();
        assert_eq!(cfg.max_threat(), 5.0);
        assert_eq!(cfg.evaluate_threat(10.0), 0.0);
        assert_eq!(cfg.evaluate_threat(25.0), 0.5);
        assert_eq!(cfg.evaluate_threat(110.0), 2.0);
        assert_eq!(cfg.evaluate_threat(10_000.0), 5.0);
        assert_eq!(cfg.evaluate_step_index(110.0), 4);

        let empty = ThreatDistanceConfig { step: 0.5, meters_thresholds: Vec::new() };
        assert_eq!(empty.evaluate_threat(500.0), 0.0);
    }

    #[test]
    fn test_normalize_sorts_thresholds() {
        let mut cfg = ThreatDistanceConfig { step: 0.0, meters_thresholds: vec![50.0, -5.0, 25.0] };
        cfg.normalize();
        assert_eq!(cfg.meters_thresholds, vec![0.0, 25.0, 50.0]);
        assert_eq!(cfg.step, 0.01);
    }

    #[test]
    fn test_highest_matching_tier_wins() {
        let mut high = ThreatLootTier::neutral(4.0);
        high.rare = 2.0;
        high.bonus_rolls = 1;
        high.bonus_roll_chance = 1.7;
        let scaling = ThreatLootScaling { tiers: vec![high, ThreatLootTier::neutral(0.0)] };

        let mut weights = RarityWeights::new(10.0, 10.0, 10.0, 10.0, 10.0, 10.0);
        let bonus = scaling.apply(1.0, &mut weights);
        assert_eq!(bonus, ThreatBonus::default());
        assert_eq!(weights.rare, 10.0);

        let bonus = scaling.apply(4.5, &mut weights);
        assert_eq!(weights.rare, 20.0);
        assert_eq!(bonus.bonus_rolls, 1);
        assert_eq!(bonus.bonus_roll_chance, 1.0);
    }

    #[test]
    fn test_negative_multiplier_clamps() {
        let mut tier = ThreatLootTier::neutral(0.0);
        tier.common = -1.0;
        let scaling = ThreatLootScaling { tiers: vec![tier] };
        let mut weights = RarityWeights::new(10.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        scaling.apply(0.0, &mut weights);
        assert_eq!(weights.common, 0.0);
    }

    #[test]
    fn test_no_tiers_below_threat() {
        let scaling = ThreatLootScaling { tiers: vec![ThreatLootTier::neutral(2.0)] };
        assert!(scaling.tier_for(1.5).is_none());
        assert!(ThreatLootScaling::default().tier_for(3.0).is_none());
    }
}
