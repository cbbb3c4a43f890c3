//! Recording platform double for engine tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::time::Duration;

use crate::device::{ClassGuid, DeviceNode, NodeStatus, StateChange};
use crate::error::DeviceError;
use crate::traits::DevicePlatform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ClassNodes(ClassGuid),
    StateChange(String, StateChange),
    NodeStatus(String),
    EndpointVisited(String),
    Settle(Duration),
}

/// In-memory platform. Nodes double as the all-classes snapshot for state changes.
#[derive(Default)]
pub struct FakePlatform {
    nodes: Vec<DeviceNode>,
    endpoints: Vec<Option<String>>,
    unavailable: bool,
    reject_enable: bool,
    statuses: RefCell<VecDeque<Option<NodeStatus>>>,
    events: RefCell<Vec<Event>>,
}

impl FakePlatform {
    pub fn with_nodes(nodes: Vec<DeviceNode>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Every call fails as if the OS snapshot could not be opened
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_endpoints(mut self, names: Vec<Option<&str>>) -> Self {
        self.endpoints = names.into_iter().map(|n| n.map(str::to_string)).collect();
        self
    }

    pub fn with_status_sequence(self, statuses: Vec<Option<NodeStatus>>) -> Self {
        *self.statuses.borrow_mut() = statuses.into();
        self
    }

    /// Enable requests report the device as gone
    pub fn rejecting_enable(mut self) -> Self {
        self.reject_enable = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn state_changes(&self) -> Vec<(String, StateChange)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::StateChange(id, change) => Some((id.clone(), *change)),
                _ => None,
            })
            .collect()
    }

    pub fn visited_endpoints(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::EndpointVisited(_)))
            .count()
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn check_available(&self) -> Result<(), DeviceError> {
        if self.unavailable {
            Err(DeviceError::unavailable("fake", "snapshot refused"))
        } else {
            Ok(())
        }
    }
}

impl DevicePlatform for FakePlatform {
    fn class_nodes(&self, class: &ClassGuid) -> Result<Vec<DeviceNode>, DeviceError> {
        self.check_available()?;
        self.record(Event::ClassNodes(*class));
        Ok(self.nodes.clone())
    }

    fn request_state_change(
        &self,
        instance_id: &str,
        change: StateChange,
    ) -> Result<(), DeviceError> {
        self.check_available()?;
        self.record(Event::StateChange(instance_id.to_string(), change));

        let present = self
            .nodes
            .iter()
            .any(|n| n.instance_id.as_deref() == Some(instance_id));
        if !present || (self.reject_enable && change == StateChange::Enable) {
            return Err(DeviceError::NotPresent(instance_id.to_string()));
        }
        Ok(())
    }

    fn node_status(&self, instance_id: &str) -> Result<Option<NodeStatus>, DeviceError> {
        self.check_available()?;
        self.record(Event::NodeStatus(instance_id.to_string()));
        Ok(self.statuses.borrow_mut().pop_front().flatten())
    }

    fn visit_render_endpoints(
        &self,
        visitor: &mut dyn FnMut(&str) -> ControlFlow<()>,
    ) -> Result<(), DeviceError> {
        self.check_available()?;
        for name in self.endpoints.iter().flatten() {
            self.record(Event::EndpointVisited(name.clone()));
            if visitor(name).is_break() {
                break;
            }
        }
        Ok(())
    }

    fn settle(&self, delay: Duration) {
        self.record(Event::Settle(delay));
    }
}
