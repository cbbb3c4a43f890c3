//! Device nodes through SetupAPI and the configuration manager

use std::mem::size_of;

use devcycle_core::{ClassGuid, DeviceError, DeviceNode, NodeStatus, StateChange};
use windows::core::{GUID, PCWSTR};
use windows::Win32::Devices::DeviceAndDriverInstallation::{
    CM_Get_DevNode_Status, CM_Locate_DevNodeW, SetupDiCallClassInstaller,
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInfo, SetupDiGetClassDevsW,
    SetupDiGetDeviceInstanceIdW, SetupDiGetDeviceRegistryPropertyW, SetupDiSetClassInstallParamsW,
    CM_DEVNODE_STATUS_FLAGS, CM_LOCATE_DEVNODE_NORMAL, CM_PROB, CR_SUCCESS, DICS_DISABLE,
    DICS_ENABLE, DICS_FLAG_GLOBAL, DIF_PROPERTYCHANGE, DIGCF_ALLCLASSES, DIGCF_PRESENT, HDEVINFO,
    SPDRP_DEVICEDESC, SP_CLASSINSTALL_HEADER, SP_DEVINFO_DATA, SP_PROPCHANGE_PARAMS,
};

use crate::wide::{from_reg_sz, from_wide_nul, to_wide_nul};

const SUBSYSTEM: &str = "SetupAPI";

/// Instance ids and descriptions longer than this are treated as unreadable
const PROPERTY_CHARS: usize = 256;

/// Owned device information set, destroyed on drop
struct DeviceInfoSet(HDEVINFO);

impl DeviceInfoSet {
    /// Present devices of one class, or of every class when `class` is `None`
    fn present(class: Option<&ClassGuid>) -> Result<Self, DeviceError> {
        let guid = class.map(|c| GUID::from_u128(c.as_u128()));
        let flags = match guid {
            Some(_) => DIGCF_PRESENT,
            None => DIGCF_PRESENT | DIGCF_ALLCLASSES,
        };

        let handle = unsafe {
            SetupDiGetClassDevsW(
                guid.as_ref().map(|g| g as *const GUID),
                PCWSTR::null(),
                None,
                flags,
            )
        }
        .map_err(|e| DeviceError::unavailable(SUBSYSTEM, e))?;

        Ok(Self(handle))
    }

    fn members(&self) -> Members<'_> {
        Members { set: self, index: 0 }
    }

    fn instance_id(&self, data: &SP_DEVINFO_DATA) -> Option<String> {
        let mut buf = [0u16; PROPERTY_CHARS];
        unsafe { SetupDiGetDeviceInstanceIdW(self.0, data, Some(&mut buf), None) }.ok()?;
        Some(from_wide_nul(&buf))
    }

    fn description(&self, data: &SP_DEVINFO_DATA) -> Option<String> {
        let mut buf = [0u8; PROPERTY_CHARS * 2];
        unsafe {
            SetupDiGetDeviceRegistryPropertyW(
                self.0,
                data,
                SPDRP_DEVICEDESC,
                None,
                Some(&mut buf),
                None,
            )
        }
        .ok()?;
        Some(from_reg_sz(&buf))
    }

    /// Submit DIF_PROPERTYCHANGE for one member. The installer's own result is only logged.
    fn dispatch_property_change(&self, data: &SP_DEVINFO_DATA, change: StateChange) {
        let params = SP_PROPCHANGE_PARAMS {
            ClassInstallHeader: SP_CLASSINSTALL_HEADER {
                cbSize: size_of::<SP_CLASSINSTALL_HEADER>() as u32,
                InstallFunction: DIF_PROPERTYCHANGE,
            },
            StateChange: match change {
                StateChange::Enable => DICS_ENABLE,
                StateChange::Disable => DICS_DISABLE,
            },
            Scope: DICS_FLAG_GLOBAL,
            HwProfile: 0,
        };

        let installed = unsafe {
            SetupDiSetClassInstallParamsW(
                self.0,
                Some(data as *const SP_DEVINFO_DATA),
                Some(&params.ClassInstallHeader as *const SP_CLASSINSTALL_HEADER),
                size_of::<SP_PROPCHANGE_PARAMS>() as u32,
            )
        };
        if let Err(e) = installed {
            tracing::warn!(%change, error = %e, "SetupDiSetClassInstallParamsW failed");
            return;
        }

        let called = unsafe {
            SetupDiCallClassInstaller(
                DIF_PROPERTYCHANGE,
                self.0,
                Some(data as *const SP_DEVINFO_DATA),
            )
        };
        if let Err(e) = called {
            tracing::warn!(%change, error = %e, "SetupDiCallClassInstaller reported failure");
        }
    }
}

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        if let Err(e) = unsafe { SetupDiDestroyDeviceInfoList(self.0) } {
            tracing::warn!(error = %e, "SetupDiDestroyDeviceInfoList failed");
        }
    }
}

/// Members of a set in enumeration order; stops at the first failed index
struct Members<'a> {
    set: &'a DeviceInfoSet,
    index: u32,
}

impl Iterator for Members<'_> {
    type Item = SP_DEVINFO_DATA;

    fn next(&mut self) -> Option<Self::Item> {
        let mut data = SP_DEVINFO_DATA {
            cbSize: size_of::<SP_DEVINFO_DATA>() as u32,
            ..Default::default()
        };
        unsafe { SetupDiEnumDeviceInfo(self.set.0, self.index, &mut data) }.ok()?;
        self.index += 1;
        Some(data)
    }
}

fn devnode_status(devinst: u32) -> Option<NodeStatus> {
    let mut status = CM_DEVNODE_STATUS_FLAGS(0);
    let mut problem = CM_PROB(0);
    let cr = unsafe { CM_Get_DevNode_Status(&mut status, &mut problem, devinst, 0) };
    if cr != CR_SUCCESS {
        tracing::trace!(devinst, code = cr.0, "CM_Get_DevNode_Status failed");
        return None;
    }
    Some(NodeStatus::new(status.0, problem.0))
}

pub(crate) fn class_nodes(class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
    let set = DeviceInfoSet::present(Some(class))?;

    let nodes = set
        .members()
        .map(|data| DeviceNode {
            instance_id: set.instance_id(&data),
            description: set.description(&data),
            status: devnode_status(data.DevInst),
        })
        .collect::<Vec<_>>();

    tracing::trace!(class = %class, count = nodes.len(), "Read class snapshot");
    Ok(nodes)
}

pub(crate) fn request_state_change(
    instance_id: &str,
    change: StateChange,
) -> Result<(), DeviceError> {
    let set = DeviceInfoSet::present(None)?;

    let target = set
        .members()
        .find(|data| set.instance_id(data).as_deref() == Some(instance_id));

    match target {
        Some(data) => {
            set.dispatch_property_change(&data, change);
            Ok(())
        }
        None => Err(DeviceError::NotPresent(instance_id.to_string())),
    }
}

pub(crate) fn node_status(instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
    let wide = to_wide_nul(instance_id);
    let mut devinst = 0u32;
    let cr = unsafe {
        CM_Locate_DevNodeW(&mut devinst, PCWSTR(wide.as_ptr()), CM_LOCATE_DEVNODE_NORMAL)
    };
    if cr != CR_SUCCESS {
        return Ok(None);
    }
    Ok(devnode_status(devinst))
}
