//! Active render endpoints through the MMDevice API

use std::ops::ControlFlow;

use devcycle_core::DeviceError;
use wasapi::{DeviceEnumerator, Direction};

use crate::com::ComScope;

const SUBSYSTEM: &str = "MMDevice";

pub(crate) fn visit_render_endpoints(
    visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
) -> Result<(), DeviceError> {
    // Declared first so the apartment outlives every interface below
    let _com = ComScope::enter()?;

    let enumerator =
        DeviceEnumerator::new().map_err(|e| DeviceError::unavailable(SUBSYSTEM, e))?;
    // Only DEVICE_STATE_ACTIVE endpoints are part of this collection
    let collection = enumerator
        .get_device_collection(&Direction::Render)
        .map_err(|e| DeviceError::unavailable(SUBSYSTEM, e))?;

    for device in &collection {
        let device = match device {
            Ok(device) => device,
            Err(e) => {
                tracing::trace!(error = %e, "Skipping unreadable endpoint");
                continue;
            }
        };

        match device.get_friendlyname() {
            Ok(name) => {
                if visitor(&name).is_break() {
                    break;
                }
            }
            Err(e) => tracing::trace!(error = %e, "Endpoint has no friendly name"),
        }
    }

    Ok(())
}
