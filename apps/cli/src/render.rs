//! User-facing text for engine results

use devcycle_core::{DeviceRecord, EndpointMatch, RefreshSummary};

pub const MSG_DEVICE_NOT_FOUND: &str = "Device not found";
pub const MSG_CHANGE_FAILED: &str = "Failed to change device state";
pub const MSG_SELECT_FIRST: &str = "Please select a device first";
pub const MSG_AUTO_DETECT_ON: &str = "Auto-detection enabled";
pub const MSG_AUTO_DETECT_OFF: &str = "Auto-detection disabled";

/// `<description>[ [<label>]] - <status>`
pub fn device_line(record: &DeviceRecord, vendor_label: &str) -> String {
    let name = if record.description.is_empty() {
        record.instance_id.as_str()
    } else {
        record.description.as_str()
    };

    let mut line = name.to_string();
    if record.is_vendor_match {
        line.push_str(&format!(" [{vendor_label}]"));
    }
    line.push_str(" - ");
    line.push_str(record.status.as_str());
    line
}

/// One line per record, prefixed with the index `--index` accepts
pub fn device_list(records: &[DeviceRecord], vendor_label: &str) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{i:>3}  {}", device_line(record, vendor_label)))
        .collect()
}

pub fn detection_message(result: &EndpointMatch) -> String {
    if result.found {
        format!("Headphones detected: {}", result.friendly_name)
    } else {
        "No headphones detected".to_string()
    }
}

pub fn refresh_message(summary: &RefreshSummary, vendor_label: &str) -> String {
    format!("Refreshed {} {} device(s)", summary.refreshed, vendor_label)
}

pub fn state_message(enable: bool) -> &'static str {
    if enable {
        "Device enabled"
    } else {
        "Device disabled"
    }
}
