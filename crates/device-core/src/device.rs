use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::VendorMatcher;

/// Device class identifier in registry form (`{xxxxxxxx-xxxx-...}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassGuid(Uuid);

impl ClassGuid {
    /// The system-defined audio device class (`Media` in Device Manager)
    pub const AUDIO: ClassGuid = ClassGuid::from_u128(0x4d36e96c_e325_11ce_bfc1_08002be10318);

    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl fmt::Display for ClassGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.braced())
    }
}

impl FromStr for ClassGuid {
    type Err = uuid::Error;

    /// Accepts the registry form with or without braces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl TryFrom<String> for ClassGuid {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClassGuid> for String {
    fn from(value: ClassGuid) -> Self {
        value.to_string()
    }
}

/// Coarse operational status derived from node status flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Disabled,
    Problem,
    Unknown,
}

impl DeviceStatus {
    /// Derive the status from a node status read.
    ///
    /// Started wins over a problem code; `None` means the status query failed.
    pub fn from_node(status: Option<NodeStatus>) -> Self {
        match status {
            None => Self::Unknown,
            Some(node) if node.is_started() => Self::Active,
            Some(node) if node.problem != 0 => Self::Problem,
            Some(_) => Self::Disabled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Disabled => "Disabled",
            Self::Problem => "Problem",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw node status as reported by the configuration manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeStatus {
    pub flags: u32,
    pub problem: u32,
}

impl NodeStatus {
    /// `DN_STARTED` from cfg.h
    pub const STARTED: u32 = 0x0000_0008;

    pub fn new(flags: u32, problem: u32) -> Self {
        Self { flags, problem }
    }

    pub fn is_started(&self) -> bool {
        self.flags & Self::STARTED != 0
    }
}

/// Requested transition for a device instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Enable,
    Disable,
}

impl StateChange {
    pub fn from_enable(enable: bool) -> Self {
        if enable {
            Self::Enable
        } else {
            Self::Disable
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
        }
    }
}

/// One device node as read from a class snapshot.
///
/// Every property read can fail on its own, so each field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceNode {
    pub instance_id: Option<String>,
    pub description: Option<String>,
    pub status: Option<NodeStatus>,
}

/// A classified device, built fresh on every enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub instance_id: String,
    pub description: String,
    pub class_guid: ClassGuid,
    pub status: DeviceStatus,
    pub is_vendor_match: bool,
}

impl DeviceRecord {
    pub fn from_node(node: DeviceNode, class_guid: ClassGuid, vendor: &VendorMatcher) -> Self {
        let instance_id = node.instance_id.unwrap_or_default();
        let description = node.description.unwrap_or_default();
        let is_vendor_match = vendor.matches(&description, &instance_id);

        Self {
            instance_id,
            description,
            class_guid,
            status: DeviceStatus::from_node(node.status),
            is_vendor_match,
        }
    }

    /// Records without an instance id cannot be passed to a state change
    pub fn is_targetable(&self) -> bool {
        !self.instance_id.is_empty()
    }
}
