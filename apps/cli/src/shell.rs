//! Command handlers
//!
//! [`Shell`] owns everything the engine must not: the effective configuration,
//! the index-to-instance-id selection of the last rendered list, and the
//! auto-detect flag. Output goes to any `Write` so handlers are testable.

use std::io::Write;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};
use devcycle_core::{DeviceError, DeviceManager, DevicePlatform, DeviceRecord, RefreshSummary};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::render::{
    detection_message, device_line, device_list, refresh_message, state_message,
    MSG_AUTO_DETECT_OFF, MSG_AUTO_DETECT_ON, MSG_CHANGE_FAILED, MSG_DEVICE_NOT_FOUND,
    MSG_SELECT_FIRST,
};
use crate::selection::SelectionMap;
use crate::watch::poll_headphones;

/// A device picked either by list position or by instance id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    InstanceId(String),
}

pub struct Shell<P> {
    manager: Arc<DeviceManager<P>>,
    config: AppConfig,
    selection: SelectionMap,
    auto_detect: bool,
}

impl<P: DevicePlatform> Shell<P> {
    pub fn new(platform: P, config: AppConfig) -> Self {
        let manager = DeviceManager::with_config(platform, config.engine.clone());
        Self {
            manager: Arc::new(manager),
            config,
            selection: SelectionMap::default(),
            auto_detect: false,
        }
    }

    pub fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    pub fn is_auto_detecting(&self) -> bool {
        self.auto_detect
    }

    fn vendor_label(&self) -> &str {
        &self.manager.config().vendor.label
    }

    /// Enumerate the configured class and rebuild the selection from it.
    /// A failed enumeration leaves nothing selectable.
    fn reload(&mut self) -> anyhow::Result<Vec<DeviceRecord>> {
        match self.manager.try_enumerate(&self.config.device_class) {
            Ok(records) => {
                self.selection.replace(&records);
                Ok(records)
            }
            Err(e) => {
                self.selection.clear();
                Err(anyhow::Error::new(e).context("Failed to enumerate devices"))
            }
        }
    }

    fn resolve(&mut self, target: &Target) -> anyhow::Result<String> {
        match target {
            Target::InstanceId(id) => Ok(id.clone()),
            Target::Index(index) => {
                self.reload()?;
                self.selection
                    .resolve(*index)
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!(MSG_SELECT_FIRST))
            }
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn list(&mut self, out: &mut dyn Write, json: bool) -> anyhow::Result<()> {
        let records = self.reload()?;

        if json {
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        } else if records.is_empty() {
            writeln!(out, "No devices found")?;
        } else {
            for line in device_list(&records, self.vendor_label()) {
                writeln!(out, "{line}")?;
            }
        }
        Ok(())
    }

    /// Headphone detection followed by the device list
    pub fn detect(&mut self, out: &mut dyn Write, json: bool) -> anyhow::Result<()> {
        let result = self
            .manager
            .try_detect_headphone_like_endpoint()
            .context("Failed to scan audio endpoints")?;

        if json {
            let records = self.reload()?;
            let body = json!({ "endpoint": result, "devices": records });
            serde_json::to_writer_pretty(&mut *out, &body)?;
            writeln!(out)?;
            return Ok(());
        }

        writeln!(out, "{}", detection_message(&result))?;
        self.list(out, false)
    }

    pub fn refresh_vendor(
        &mut self,
        out: &mut dyn Write,
        json: bool,
    ) -> anyhow::Result<RefreshSummary> {
        let summary = self
            .manager
            .try_refresh_vendor_devices(&self.config.device_class)
            .context("Failed to enumerate devices")?;

        if json {
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
            return Ok(summary);
        }

        writeln!(out, "{}", refresh_message(&summary, self.vendor_label()))?;
        for record in &summary.failed {
            writeln!(out, "  not refreshed: {}", device_line(record, self.vendor_label()))?;
        }
        self.list(out, false)?;
        Ok(summary)
    }

    pub fn refresh(&mut self, out: &mut dyn Write, target: &Target) -> anyhow::Result<()> {
        let instance_id = self.resolve(target)?;
        self.manager
            .try_refresh(&instance_id)
            .map_err(state_change_error)?;

        writeln!(out, "Device refreshed")?;
        Ok(())
    }

    pub fn set_state(
        &mut self,
        out: &mut dyn Write,
        target: &Target,
        enable: bool,
    ) -> anyhow::Result<()> {
        let instance_id = self.resolve(target)?;
        self.manager
            .try_set_state(&instance_id, enable)
            .map_err(state_change_error)?;

        writeln!(out, "{}", state_message(enable))?;

        // Dispatch is not confirmation; give the driver a moment before re-listing
        thread::sleep(self.config.post_change_delay());
        self.list(out, false)
    }
}

impl<P: DevicePlatform + Send + Sync + 'static> Shell<P> {
    /// Poll detection until `cancel` fires, printing a timestamped line per change.
    ///
    /// With `json`, each change is one JSON object per line and the banners are
    /// left out.
    pub async fn watch(
        &mut self,
        out: &mut dyn Write,
        json: bool,
        cancel: CancellationToken,
    ) -> anyhow::Result<usize> {
        self.auto_detect = true;
        if !json {
            writeln!(out, "{MSG_AUTO_DETECT_ON}")?;
        }

        let mut write_error: Option<anyhow::Error> = None;
        let polls = poll_headphones(
            Arc::clone(&self.manager),
            self.config.poll_interval(),
            cancel.clone(),
            |result| {
                let now = chrono::Local::now();
                let written = if json {
                    let line = json!({ "time": now.to_rfc3339(), "endpoint": result });
                    serde_json::to_writer(&mut *out, &line)
                        .map_err(anyhow::Error::from)
                        .and_then(|()| writeln!(out).map_err(anyhow::Error::from))
                } else {
                    let stamp = now.format("%H:%M:%S");
                    writeln!(out, "[{stamp}] {}", detection_message(result))
                        .map_err(anyhow::Error::from)
                };
                if let Err(e) = written {
                    write_error.get_or_insert(e);
                    cancel.cancel();
                }
            },
        )
        .await;

        self.auto_detect = false;
        if let Some(e) = write_error {
            return Err(e);
        }
        if !json {
            writeln!(out, "{MSG_AUTO_DETECT_OFF}")?;
        }
        polls
    }
}

fn state_change_error(error: DeviceError) -> anyhow::Error {
    if error.is_not_present() {
        anyhow!(MSG_DEVICE_NOT_FOUND)
    } else {
        anyhow::Error::new(error).context(MSG_CHANGE_FAILED)
    }
}
