//! Parse orchestration budgets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time budgets for the parse orchestrator stages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParserConfig {
    /// Primary parser timeout in milliseconds. Default: 5000.
    pub primary_timeout_ms: Option<u64>,
    /// Per-strategy recovery budget in milliseconds. Default: 50.
    pub recovery_budget_ms: Option<u64>,
    /// Fallback extraction budget in milliseconds. Default: 100.
    pub fallback_budget_ms: Option<u64>,
}

impl ParserConfig {
    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms.unwrap_or(5_000))
    }

    pub fn recovery_budget(&self) -> Duration {
        Duration::from_millis(self.recovery_budget_ms.unwrap_or(50))
    }

    pub fn fallback_budget(&self) -> Duration {
        Duration::from_millis(self.fallback_budget_ms.unwrap_or(100))
    }
}
