use std::ops::ControlFlow;
use std::time::Duration;

use crate::device::{ClassGuid, DeviceNode, NodeStatus, StateChange};
use crate::error::DeviceError;

/// Operating-system boundary of the engine.
///
/// Implementations open their OS handles per call and release them before
/// returning; nothing is held between calls.
pub trait DevicePlatform {
    /// Read every present device node of `class`, in OS enumeration order
    fn class_nodes(&self, class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError>;

    /// Submit an enable/disable request for the first present node whose
    /// instance id equals `instance_id` exactly.
    ///
    /// `Ok` means the request was dispatched, not that the transition finished.
    /// Returns `DeviceError::NotPresent` when no node matched.
    fn request_state_change(&self, instance_id: &str, change: StateChange)
        -> Result<(), DeviceError>;

    /// Current node status of a present instance, `None` if it is not present
    fn node_status(&self, instance_id: &str) -> Result<Option<NodeStatus>, DeviceError>;

    /// Walk the friendly names of active render endpoints in OS order until
    /// `visitor` breaks. Endpoints whose name cannot be read are skipped.
    fn visit_render_endpoints(
        &self,
        visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError>;

    /// Block the calling thread between the two halves of a refresh
    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl<P: DevicePlatform + ?Sized> DevicePlatform for &P {
    fn class_nodes(&self, class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
        (**self).class_nodes(class)
    }

    fn request_state_change(
        &self,
        instance_id: &str,
        change: StateChange,
    ) -> Result<(), DeviceError> {
        (**self).request_state_change(instance_id, change)
    }

    fn node_status(&self, instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
        (**self).node_status(instance_id)
    }

    fn visit_render_endpoints(
        &self,
        visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError> {
        (**self).visit_render_endpoints(visitor)
    }

    fn settle(&self, delay: Duration) {
        (**self).settle(delay)
    }
}
