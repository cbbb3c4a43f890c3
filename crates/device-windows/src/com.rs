//! Scoped COM apartment for endpoint enumeration

use devcycle_core::DeviceError;

/// RPC_E_CHANGED_MODE: the thread already joined an apartment of the other kind
const RPC_E_CHANGED_MODE: i32 = 0x8001_0106_u32 as i32;

/// Joins the multithreaded apartment for the lifetime of the guard.
///
/// Every successful initialization, including S_FALSE, is balanced on drop.
/// A thread that already lives in a single-threaded apartment keeps it and the
/// guard leaves it alone.
pub(crate) struct ComScope {
    owned: bool,
}

impl ComScope {
    pub(crate) fn enter() -> Result<Self, DeviceError> {
        let hr = wasapi::initialize_mta();
        if hr.is_ok() {
            return Ok(Self { owned: true });
        }
        if hr.0 == RPC_E_CHANGED_MODE {
            tracing::debug!("Thread already in an STA, reusing it");
            return Ok(Self { owned: false });
        }
        Err(DeviceError::unavailable(
            "COM",
            format!("CoInitializeEx returned {:#010x}", hr.0),
        ))
    }
}

impl Drop for ComScope {
    fn drop(&mut self) {
        if self.owned {
            wasapi::deinitialize();
        }
    }
}
