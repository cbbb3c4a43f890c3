//! Scripted platform for shell tests

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use devcycle_core::{ClassGuid, DeviceError, DeviceNode, DevicePlatform, NodeStatus, StateChange};

/// Fixed device nodes plus a queue of endpoint snapshots, one per scan.
/// The last snapshot repeats once the queue runs dry.
#[derive(Default)]
pub struct ScriptedPlatform {
    nodes: Vec<DeviceNode>,
    unavailable: AtomicBool,
    reject_enable: bool,
    scans: Mutex<VecDeque<Vec<String>>>,
    last_scan: Mutex<Vec<String>>,
    changes: Mutex<Vec<(String, StateChange)>>,
}

impl ScriptedPlatform {
    pub fn with_nodes(nodes: Vec<DeviceNode>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn with_scans(self, scans: Vec<Vec<&str>>) -> Self {
        *self.scans.lock().unwrap() = scans
            .into_iter()
            .map(|scan| scan.into_iter().map(str::to_string).collect())
            .collect();
        self
    }

    /// Device calls fail as if SetupAPI could not be opened
    pub fn unavailable(self) -> Self {
        self.set_unavailable(true);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Disable requests succeed, enable requests report the device missing
    pub fn rejecting_enable(mut self) -> Self {
        self.reject_enable = true;
        self
    }

    fn check_available(&self) -> Result<(), DeviceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DeviceError::unavailable("SetupAPI", "access denied"));
        }
        Ok(())
    }

    pub fn changes(&self) -> Vec<(String, StateChange)> {
        self.changes.lock().unwrap().clone()
    }
}

pub fn node(id: &str, description: &str, started: bool) -> DeviceNode {
    DeviceNode {
        instance_id: Some(id.to_string()),
        description: Some(description.to_string()),
        status: Some(NodeStatus::new(if started { NodeStatus::STARTED } else { 0 }, 0)),
    }
}

impl DevicePlatform for ScriptedPlatform {
    fn class_nodes(&self, _class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
        self.check_available()?;
        Ok(self.nodes.clone())
    }

    fn request_state_change(
        &self,
        instance_id: &str,
        change: StateChange,
    ) -> Result<(), DeviceError> {
        self.check_available()?;
        self.changes
            .lock()
            .unwrap()
            .push((instance_id.to_string(), change));
        let present = self
            .nodes
            .iter()
            .any(|n| n.instance_id.as_deref() == Some(instance_id));
        if present && !(self.reject_enable && change == StateChange::Enable) {
            Ok(())
        } else {
            Err(DeviceError::NotPresent(instance_id.to_string()))
        }
    }

    fn node_status(&self, _instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
        Ok(None)
    }

    fn visit_render_endpoints(
        &self,
        visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError> {
        let scan = {
            let mut last = self.last_scan.lock().unwrap();
            if let Some(next) = self.scans.lock().unwrap().pop_front() {
                *last = next;
            }
            last.clone()
        };
        for name in &scan {
            if visitor(name).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn settle(&self, _delay: Duration) {}
}
