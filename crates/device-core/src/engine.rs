//! Device lifecycle engine
//!
//! [`DeviceManager`] composes the platform calls into the four caller-facing
//! operations: enumerate, set state, refresh and headphone detection. Each
//! operation comes in two forms:
//!
//! - `try_*` returns `Result<_, DeviceError>` and keeps "nothing matched"
//!   apart from "the OS subsystem failed".
//! - The plain form collapses every error into the neutral result (empty
//!   list, `false`, `found == false`). It never panics and never propagates.
//!
//! The manager holds no state between calls beyond its configuration.

use std::ops::ControlFlow;
use std::time::Duration;

use serde::Serialize;

use crate::config::{EngineConfig, SettleMode};
use crate::device::{ClassGuid, DeviceRecord, StateChange};
use crate::endpoint::{matching_keyword, EndpointMatch};
use crate::error::DeviceError;
use crate::traits::DevicePlatform;

/// Outcome of a vendor refresh sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    /// Vendor-matching records a refresh was attempted on
    pub attempted: usize,
    /// Refreshes whose enable half was dispatched
    pub refreshed: usize,
    /// Records whose refresh returned false
    pub failed: Vec<DeviceRecord>,
}

pub struct DeviceManager<P> {
    platform: P,
    config: EngineConfig,
}

impl<P: DevicePlatform> DeviceManager<P> {
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, EngineConfig::default())
    }

    pub fn with_config(platform: P, config: EngineConfig) -> Self {
        Self { platform, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Enumerate present devices of `class` into fresh records
    pub fn try_enumerate(&self, class: &ClassGuid) -> Result<Vec<DeviceRecord>, DeviceError> {
        let nodes = self.platform.class_nodes(class)?;
        let records: Vec<DeviceRecord> = nodes
            .into_iter()
            .map(|node| DeviceRecord::from_node(node, *class, &self.config.vendor))
            .collect();

        tracing::debug!(class = %class, count = records.len(), "Enumerated device class");
        Ok(records)
    }

    /// Enumerate, treating any failure as an empty class
    pub fn enumerate(&self, class: &ClassGuid) -> Vec<DeviceRecord> {
        self.try_enumerate(class).unwrap_or_else(|e| {
            tracing::warn!(class = %class, error = %e, "Enumeration failed, reporting no devices");
            Vec::new()
        })
    }

    // ========================================================================
    // State changes
    // ========================================================================

    /// Request enable or disable of one instance.
    ///
    /// An empty id is rejected before any platform call.
    pub fn try_set_state(&self, instance_id: &str, enable: bool) -> Result<(), DeviceError> {
        if instance_id.is_empty() {
            return Err(DeviceError::EmptyInstanceId);
        }

        let change = StateChange::from_enable(enable);
        self.platform.request_state_change(instance_id, change)?;
        tracing::debug!(instance_id, %change, "State change dispatched");
        Ok(())
    }

    /// `true` when a matching device was found and the request was submitted
    pub fn set_state(&self, instance_id: &str, enable: bool) -> bool {
        match self.try_set_state(instance_id, enable) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(instance_id, enable, error = %e, "State change not dispatched");
                false
            }
        }
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Disable, settle, then enable. Enable is never attempted if disable fails.
    ///
    /// A failed enable is reported as [`DeviceError::ReenableFailed`], since the
    /// device is left disabled at that point.
    pub fn try_refresh(&self, instance_id: &str) -> Result<(), DeviceError> {
        self.try_set_state(instance_id, false)?;
        self.settle_after_disable(instance_id);
        self.try_set_state(instance_id, true)
            .map_err(|source| DeviceError::ReenableFailed {
                instance_id: instance_id.to_string(),
                source: Box::new(source),
            })
    }

    pub fn refresh(&self, instance_id: &str) -> bool {
        match self.try_refresh(instance_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(instance_id, error = %e, "Refresh failed");
                false
            }
        }
    }

    fn settle_after_disable(&self, instance_id: &str) {
        match self.config.settle {
            SettleMode::Fixed { delay_ms } => {
                self.platform.settle(Duration::from_millis(delay_ms));
            }
            SettleMode::ConfirmDisabled {
                poll_interval_ms,
                timeout_ms,
            } => {
                let interval = Duration::from_millis(poll_interval_ms.max(1));
                let timeout = Duration::from_millis(timeout_ms);
                let mut waited = Duration::ZERO;

                loop {
                    self.platform.settle(interval);
                    waited += interval;

                    match self.platform.node_status(instance_id) {
                        Ok(Some(status)) if status.is_started() => {}
                        Ok(_) => {
                            tracing::debug!(instance_id, waited_ms = waited.as_millis() as u64, "Device stopped");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(instance_id, error = %e, "Node status poll failed, enabling anyway");
                            break;
                        }
                    }

                    if waited >= timeout {
                        tracing::warn!(instance_id, timeout_ms, "Device still started after timeout, enabling anyway");
                        break;
                    }
                }
            }
        }
    }

    /// Refresh every vendor-matching device of `class`, in enumeration order
    pub fn try_refresh_vendor_devices(
        &self,
        class: &ClassGuid,
    ) -> Result<RefreshSummary, DeviceError> {
        let mut summary = RefreshSummary::default();

        for record in self.try_enumerate(class)? {
            if !record.is_vendor_match {
                continue;
            }
            summary.attempted += 1;
            if !record.is_targetable() {
                tracing::debug!(description = %record.description, "Vendor match has no instance id");
                summary.failed.push(record);
                continue;
            }
            if self.refresh(&record.instance_id) {
                summary.refreshed += 1;
            } else {
                summary.failed.push(record);
            }
        }

        tracing::info!(
            class = %class,
            attempted = summary.attempted,
            refreshed = summary.refreshed,
            "Vendor refresh sweep finished"
        );
        Ok(summary)
    }

    pub fn refresh_vendor_devices(&self, class: &ClassGuid) -> RefreshSummary {
        self.try_refresh_vendor_devices(class).unwrap_or_else(|e| {
            tracing::warn!(class = %class, error = %e, "Vendor refresh sweep could not enumerate");
            RefreshSummary::default()
        })
    }

    // ========================================================================
    // Headphone detection
    // ========================================================================

    /// First active render endpoint whose friendly name contains a headphone keyword
    pub fn try_detect_headphone_like_endpoint(&self) -> Result<EndpointMatch, DeviceError> {
        let mut matched: Option<String> = None;

        self.platform.visit_render_endpoints(&mut |name| {
            match matching_keyword(name) {
                Some(keyword) => {
                    tracing::debug!(endpoint = name, keyword, "Headphone-like endpoint found");
                    matched = Some(name.to_string());
                    ControlFlow::Break(())
                }
                None => ControlFlow::Continue(()),
            }
        })?;

        Ok(matched.map(EndpointMatch::found).unwrap_or_default())
    }

    pub fn detect_headphone_like_endpoint(&self) -> EndpointMatch {
        self.try_detect_headphone_like_endpoint()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Endpoint scan failed, reporting no headphones");
                EndpointMatch::not_found()
            })
    }
}
