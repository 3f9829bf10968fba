//! Enemy level & stat scaling based on player level + node tier
//!
//! All functions are pure and total: out-of-range inputs are clamped or
//! saturated, never rejected.

use serde::{Deserialize, Serialize};

use crate::meta::ProgressionStore;
use crate::round_half_up;

/// Enemy rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyKind {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Normal => "NORMAL",
            EnemyKind::Elite => "ELITE",
            EnemyKind::Boss => "BOSS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(EnemyKind::Normal),
            "elite" => Some(EnemyKind::Elite),
            "boss" => Some(EnemyKind::Boss),
            _ => None,
        }
    }

    /// HP multiplier on top of level/tier growth
    pub fn hp_multiplier(&self) -> f64 {
        match self {
            EnemyKind::Normal => 1.0,
            EnemyKind::Elite => 1.8,
            EnemyKind::Boss => 6.0,
        }
    }

    /// Damage multiplier on top of level/tier growth
    pub fn damage_multiplier(&self) -> f64 {
        match self {
            EnemyKind::Normal => 1.0,
            EnemyKind::Elite => 1.25,
            EnemyKind::Boss => 1.6,
        }
    }
}

/// Spawn/encounter knobs for a node tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterParams {
    /// Chance a spawned enemy is elite (0.06 - 0.25)
    pub elite_rate: f64,
    /// Enemy bullet pattern complexity (1 - 8)
    pub projectile_complexity: u32,
    /// Spawn count multiplier (1.0 - 2.2)
    pub spawn_density: f64,
}

/// Difficulty tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scaling {
    /// Normals sit ~1-2 levels under the player
    pub delta: f64,
    pub level_hp_growth: f64,
    pub level_dmg_growth: f64,
    pub tier_hp_growth: f64,
    pub tier_dmg_growth: f64,
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            delta: 1.5,
            level_hp_growth: 1.065,
            level_dmg_growth: 1.055,
            tier_hp_growth: 0.018,
            tier_dmg_growth: 0.012,
        }
    }
}

impl Scaling {
    /// Load tunables from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn enemy_level(&self, player_level: u32, node_tier: u32, kind: EnemyKind) -> u32 {
        let player = f64::from(player_level);
        let pressure = round_half_up((f64::from(node_tier) - player) * 0.35).clamp(-2.0, 3.0);
        let base = (player - self.delta + pressure).floor().max(1.0) as u32;

        match kind {
            EnemyKind::Normal => base,
            EnemyKind::Elite => base
                .saturating_add(2 + node_tier / 10)
                .min(player_level.saturating_add(5)),
            EnemyKind::Boss => base
                .saturating_add(4 + node_tier / 6)
                .min(player_level.saturating_add(10)),
        }
    }

    pub fn hp(&self, base_hp: f64, level: u32, node_tier: u32, kind: EnemyKind) -> u64 {
        grow(
            base_hp,
            self.level_hp_growth,
            level,
            self.tier_hp_growth,
            node_tier,
            kind.hp_multiplier(),
        )
    }

    pub fn damage(&self, base_dmg: f64, level: u32, node_tier: u32, kind: EnemyKind) -> u64 {
        grow(
            base_dmg,
            self.level_dmg_growth,
            level,
            self.tier_dmg_growth,
            node_tier,
            kind.damage_multiplier(),
        )
    }

    pub fn encounter_params(&self, node_tier: u32) -> EncounterParams {
        let tier = f64::from(node_tier);
        EncounterParams {
            elite_rate: (0.06 + 0.0025 * tier).min(0.25),
            projectile_complexity: (1 + node_tier / 7).min(8),
            spawn_density: (1.0 + 0.03 * tier).min(2.2),
        }
    }

    /// Encounter knobs for the store's current node
    pub fn current_encounter(&self, store: &ProgressionStore) -> EncounterParams {
        self.encounter_params(store.current_tier())
    }
}

/// `round(max(1, base * level_growth^level * (1 + tier_growth * tier) * mult))`
fn grow(base: f64, level_growth: f64, level: u32, tier_growth: f64, tier: u32, mult: f64) -> u64 {
    let value = base
        * level_growth.powf(f64::from(level))
        * (1.0 + tier_growth * f64::from(tier))
        * mult;
    // f64::max drops NaN; the cast saturates at u64::MAX
    round_half_up(value.max(1.0)) as u64
}

/// `Scaling::enemy_level` with default tunables
pub fn enemy_level(player_level: u32, node_tier: u32, kind: EnemyKind) -> u32 {
    Scaling::default().enemy_level(player_level, node_tier, kind)
}

/// `Scaling::hp` with default tunables
pub fn hp(base_hp: f64, level: u32, node_tier: u32, kind: EnemyKind) -> u64 {
    Scaling::default().hp(base_hp, level, node_tier, kind)
}

/// `Scaling::damage` with default tunables
pub fn damage(base_dmg: f64, level: u32, node_tier: u32, kind: EnemyKind) -> u64 {
    Scaling::default().damage(base_dmg, level, node_tier, kind)
}

/// `Scaling::encounter_params` with default tunables
pub fn encounter_params(node_tier: u32) -> EncounterParams {
    Scaling::default().encounter_params(node_tier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_enemy_level_examples() {
        use EnemyKind::*;
        let cases = [
            ((10, 5), [6, 8, 10]),
            ((10, 30), [11, 15, 20]),
            ((1, 1), [1, 3, 5]),
            ((0, 0), [1, 3, 5]),
            ((5, 40), [6, 10, 15]),
            ((20, 20), [18, 22, 25]),
            ((3, 60), [4, 8, 13]),
        ];
        for ((player, tier), expected) in cases {
            let got = [Normal, Elite, Boss].map(|k| enemy_level(player, tier, k));
            assert_eq!(got, expected, "player {player} tier {tier}");
        }
    }

    #[test]
    fn test_hp_and_damage() {
        // 100 * 1.065^10 * 1.09 = 204.6
        assert_eq!(hp(100.0, 10, 5, EnemyKind::Normal), 205);
        assert_eq!(hp(100.0, 10, 5, EnemyKind::Elite), 368);
        assert_eq!(hp(100.0, 10, 5, EnemyKind::Boss), 1228);
        assert_eq!(hp(50.0, 1, 1, EnemyKind::Normal), 54);

        assert_eq!(damage(10.0, 10, 5, EnemyKind::Normal), 18);
        assert_eq!(damage(10.0, 10, 5, EnemyKind::Elite), 23);
        assert_eq!(damage(10.0, 10, 5, EnemyKind::Boss), 29);
    }

    #[test]
    fn test_stats_floor_at_one() {
        assert_eq!(hp(0.0, 0, 0, EnemyKind::Normal), 1);
        assert_eq!(damage(0.2, 0, 0, EnemyKind::Normal), 1);
        assert_eq!(hp(-50.0, 3, 3, EnemyKind::Boss), 1);
        assert_eq!(damage(f64::NAN, 3, 3, EnemyKind::Elite), 1);
    }

    #[test]
    fn test_encounter_params() {
        let low = encounter_params(0);
        assert!((low.elite_rate - 0.06).abs() < 1e-12);
        assert_eq!(low.projectile_complexity, 1);
        assert!((low.spawn_density - 1.0).abs() < 1e-12);

        let mid = encounter_params(20);
        assert!((mid.elite_rate - 0.11).abs() < 1e-12);
        assert_eq!(mid.projectile_complexity, 3);
        assert!((mid.spawn_density - 1.6).abs() < 1e-12);

        let high = encounter_params(100);
        assert_eq!(high.elite_rate, 0.25);
        assert_eq!(high.projectile_complexity, 8);
        assert_eq!(high.spawn_density, 2.2);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(EnemyKind::from_str("ELITE"), Some(EnemyKind::Elite));
        assert_eq!(EnemyKind::from_str("boss"), Some(EnemyKind::Boss));
        assert_eq!(EnemyKind::from_str("Normal"), Some(EnemyKind::Normal));
        assert_eq!(EnemyKind::from_str("MINION"), None);
        assert_eq!(EnemyKind::Elite.as_str(), "ELITE");
    }

    #[test]
    fn test_tuning_from_json() {
        let tuning = Scaling::from_json(r#"{ "delta": 3.0 }"#).unwrap();
        assert_eq!(tuning.delta, 3.0);
        assert_eq!(tuning.level_hp_growth, Scaling::default().level_hp_growth);
        assert_eq!(tuning.enemy_level(10, 10, EnemyKind::Normal), 7);

        assert!(Scaling::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_current_encounter_uses_store_tier() {
        let mut store = ProgressionStore::new();
        let scaling = Scaling::default();
        assert_eq!(scaling.current_encounter(&store), encounter_params(1));

        for i in 0..6 {
            store.mark_cleared(&format!("ACT_01_C1_N{i}"));
            assert!(store.set_current_node(&format!("ACT_01_C1_N{}", i + 1)));
        }
        assert_eq!(store.current_tier(), 3);
        assert_eq!(scaling.current_encounter(&store), encounter_params(3));
    }

    proptest! {
        #[test]
        fn scaling_is_total(player in any::<u32>(), tier in any::<u32>(), base in 0.0f64..1e6) {
            for kind in [EnemyKind::Normal, EnemyKind::Elite, EnemyKind::Boss] {
                let level = enemy_level(player, tier, kind);
                prop_assert!(level >= 1);
                prop_assert!(hp(base, level, tier, kind) >= 1);
                prop_assert!(damage(base, level, tier, kind) >= 1);
            }
            let params = encounter_params(tier);
            prop_assert!(params.elite_rate <= 0.25);
            prop_assert!(params.projectile_complexity <= 8);
            prop_assert!(params.spawn_density <= 2.2);
        }

        #[test]
        fn special_levels_are_capped(player in 0u32..200, tier in 0u32..400) {
            prop_assert!(enemy_level(player, tier, EnemyKind::Elite) <= player + 5);
            prop_assert!(enemy_level(player, tier, EnemyKind::Boss) <= player + 10);
        }
    }
}
