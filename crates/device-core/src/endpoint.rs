use serde::{Deserialize, Serialize};

/// Friendly-name fragments that mark a render endpoint as headphone-like, in test order
pub const HEADPHONE_KEYWORDS: [&str; 3] = ["Headphone", "Headset", "Earphone"];

/// Result of a headphone-like endpoint scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMatch {
    pub found: bool,
    pub friendly_name: String,
}

impl EndpointMatch {
    pub fn found(friendly_name: impl Into<String>) -> Self {
        Self {
            found: true,
            friendly_name: friendly_name.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }
}

/// First keyword contained in `friendly_name`, case-sensitive
pub fn matching_keyword(friendly_name: &str) -> Option<&'static str> {
    HEADPHONE_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| friendly_name.contains(keyword))
}
