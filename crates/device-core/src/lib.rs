mod config;
mod device;
mod endpoint;
mod engine;
mod error;
mod traits;

#[cfg(test)]
mod testing;

pub use config::{EngineConfig, SettleMode, VendorMatcher, DEFAULT_SETTLE_DELAY};
pub use device::{ClassGuid, DeviceNode, DeviceRecord, DeviceStatus, NodeStatus, StateChange};
pub use endpoint::{matching_keyword, EndpointMatch, HEADPHONE_KEYWORDS};
pub use engine::{DeviceManager, RefreshSummary};
pub use error::DeviceError;
pub use traits::DevicePlatform;
