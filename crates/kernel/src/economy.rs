use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strikewing_common::EnemyKind;

/// Coins credited for a kill when the reward table has no entry for the kind.
pub const DEFAULT_REWARD: u64 = 5;

/// Wave timing, in seconds. Each interval is drawn uniformly from the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub interval_min: f64,
    pub interval_max: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_min: 6.0,
            interval_max: 11.0,
        }
    }
}

/// Economy tuning: wave timing and per-kind kill rewards.
///
/// Rewards are keyed by kind name so that content files may carry kinds the
/// kernel does not know yet; unknown keys are ignored and missing ones pay
/// [`DEFAULT_REWARD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub rewards: BTreeMap<String, u64>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        let rewards = [("soldier", 10), ("car", 30), ("tank", 75)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self {
            spawn: SpawnConfig::default(),
            rewards,
        }
    }
}

impl EconomyConfig {
    pub fn reward(&self, kind: EnemyKind) -> u64 {
        self.rewards
            .get(kind.as_str())
            .copied()
            .unwrap_or(DEFAULT_REWARD)
    }
}
