//! Windows device lifecycle backend
//!
//! Device nodes come from SetupAPI class snapshots and CfgMgr32 node status;
//! enable/disable goes through the class installer (DIF_PROPERTYCHANGE);
//! headphone detection walks active render endpoints with WASAPI's MMDevice
//! wrappers inside a per-call COM apartment.
//!
//! On other targets the crate still builds, and [`WindowsPlatform`] reports
//! `DeviceError::PlatformNotSupported` from every call.

#[cfg(target_os = "windows")]
mod com;
#[cfg(target_os = "windows")]
mod device;
#[cfg(target_os = "windows")]
mod endpoint;
mod platform;
mod wide;

pub use devcycle_core::{
    ClassGuid, DeviceError, DeviceManager, DevicePlatform, DeviceRecord, DeviceStatus,
    EndpointMatch, EngineConfig, RefreshSummary,
};
pub use platform::WindowsPlatform;

/// Engine bound to the native platform
pub fn manager(config: EngineConfig) -> DeviceManager<WindowsPlatform> {
    DeviceManager::with_config(WindowsPlatform::new(), config)
}
