//! Index to instance-id mapping for the last rendered device list

use devcycle_core::DeviceRecord;

/// Parallel to the rendered list: entry `i` is the instance id shown at index `i`.
///
/// Owned by the shell and rebuilt on every enumeration; the engine never sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    ids: Vec<String>,
}

impl SelectionMap {
    pub fn from_records(records: &[DeviceRecord]) -> Self {
        Self {
            ids: records.iter().map(|r| r.instance_id.clone()).collect(),
        }
    }

    /// Instance id at `index`, `None` when nothing is shown there
    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn replace(&mut self, records: &[DeviceRecord]) {
        *self = Self::from_records(records);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcycle_core::{ClassGuid, DeviceStatus};

    fn record(id: &str) -> DeviceRecord {
        DeviceRecord {
            instance_id: id.to_string(),
            description: format!("Device {id}"),
            class_guid: ClassGuid::AUDIO,
            status: DeviceStatus::Active,
            is_vendor_match: false,
        }
    }

    #[test]
    fn test_resolve_follows_list_order() {
        let map = SelectionMap::from_records(&[record("A"), record("B")]);
        assert_eq!(map.resolve(0), Some("A"));
        assert_eq!(map.resolve(1), Some("B"));
        assert_eq!(map.resolve(2), None);
    }

    #[test]
    fn test_replace_drops_previous_entries() {
        let mut map = SelectionMap::from_records(&[record("A"), record("B")]);
        map.replace(&[record("C")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve(0), Some("C"));
        assert_eq!(map.resolve(1), None);
    }

    #[test]
    fn test_clear() {
        let mut map = SelectionMap::from_records(&[record("A")]);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.resolve(0), None);
    }
}
