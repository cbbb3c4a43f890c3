use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default settle interval between disable and enable
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Case-sensitive vendor substring test over description and instance id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VendorMatcher {
    /// Substrings looked for in both the description and the instance id
    pub patterns: Vec<String>,
    /// Marker the shell shows next to matching devices
    pub label: String,
}

impl Default for VendorMatcher {
    fn default() -> Self {
        Self {
            // Marketing spelling shows up in descriptions, upper case in hardware ids
            patterns: vec!["Realtek".to_string(), "REALTEK".to_string()],
            label: "REALTEK".to_string(),
        }
    }
}

impl VendorMatcher {
    pub fn new(patterns: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            patterns,
            label: label.into(),
        }
    }

    pub fn matches(&self, description: &str, instance_id: &str) -> bool {
        self.patterns
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| description.contains(p.as_str()) || instance_id.contains(p.as_str()))
    }
}

/// How the refresh cycle waits between its disable and enable requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettleMode {
    /// Unconditional sleep
    Fixed { delay_ms: u64 },
    /// Poll node status until the device reports not started, bounded by a timeout.
    /// Enable is issued either way once polling ends.
    ConfirmDisabled { poll_interval_ms: u64, timeout_ms: u64 },
}

impl Default for SettleMode {
    fn default() -> Self {
        Self::Fixed {
            delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub vendor: VendorMatcher,
    pub settle: SettleMode,
}
