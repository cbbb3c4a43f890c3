use std::ops::ControlFlow;

use devcycle_core::{ClassGuid, DeviceError, DeviceNode, DevicePlatform, NodeStatus, StateChange};

/// Device platform backed by SetupAPI, CfgMgr32 and the MMDevice API.
///
/// Stateless: every call opens its own snapshot or enumerator and releases it
/// before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPlatform {
    _private: (),
}

impl WindowsPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(target_os = "windows")]
impl DevicePlatform for WindowsPlatform {
    fn class_nodes(&self, class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
        crate::device::class_nodes(class)
    }

    fn request_state_change(
        &self,
        instance_id: &str,
        change: StateChange,
    ) -> Result<(), DeviceError> {
        crate::device::request_state_change(instance_id, change)
    }

    fn node_status(&self, instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
        crate::device::node_status(instance_id)
    }

    fn visit_render_endpoints(
        &self,
        visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError> {
        crate::endpoint::visit_render_endpoints(visitor)
    }
}

// Other targets build, but every call reports the platform as unsupported.
#[cfg(not(target_os = "windows"))]
fn unsupported<T>() -> Result<T, DeviceError> {
    Err(DeviceError::PlatformNotSupported(
        "device configuration requires Windows".to_string(),
    ))
}

#[cfg(not(target_os = "windows"))]
impl DevicePlatform for WindowsPlatform {
    fn class_nodes(&self, _class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
        unsupported()
    }

    fn request_state_change(
        &self,
        _instance_id: &str,
        _change: StateChange,
    ) -> Result<(), DeviceError> {
        unsupported()
    }

    fn node_status(&self, _instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
        unsupported()
    }

    fn visit_render_endpoints(
        &self,
        _visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError> {
        unsupported()
    }
}
