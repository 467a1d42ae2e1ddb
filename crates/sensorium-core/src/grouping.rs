// ── Grouping engine ──
//
// Partitions a flat list of live readings by owning device and pairs each
// group with its device metadata. Rebuilt from scratch on every poll.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Device, SensorReading};

/// Readings keyed by device id. Groups keep first-seen order and readings
/// keep source order within a group.
pub type ReadingGroups = IndexMap<String, Vec<SensorReading>>;

/// One device section on the live view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceGroup {
    pub device: Device,
    pub readings: Vec<SensorReading>,
}

/// Group readings by `device_id` in a single pass. Nothing is dropped or
/// deduplicated.
pub fn group_by_device<I>(readings: I) -> ReadingGroups
where
    I: IntoIterator<Item = SensorReading>,
{
    let mut groups = ReadingGroups::new();
    for reading in readings {
        groups
            .entry(reading.device_id.clone())
            .or_default()
            .push(reading);
    }
    groups
}

/// Index devices by id. On repeated ids the last one wins.
pub fn index_devices<I>(devices: I) -> HashMap<String, Device>
where
    I: IntoIterator<Item = Device>,
{
    devices.into_iter().map(|d| (d.id.clone(), d)).collect()
}

/// Group readings and attach device metadata, falling back to
/// [`Device::placeholder`] for devices the lookup does not know.
pub fn device_groups<R, D>(readings: R, devices: D) -> Vec<DeviceGroup>
where
    R: IntoIterator<Item = SensorReading>,
    D: IntoIterator<Item = Device>,
{
    let mut lookup = index_devices(devices);
    group_by_device(readings)
        .into_iter()
        .map(|(device_id, readings)| DeviceGroup {
            device: lookup
                .remove(&device_id)
                .unwrap_or_else(|| Device::placeholder(device_id)),
            readings,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(sensor: &str, device: &str) -> SensorReading {
        SensorReading {
            sensor_id: sensor.into(),
            device_id: device.into(),
            ..SensorReading::default()
        }
    }

    fn ids(readings: &[SensorReading]) -> Vec<&str> {
        readings.iter().map(|r| r.sensor_id.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_empty_groups() {
        assert!(group_by_device(Vec::new()).is_empty());
        assert!(device_groups(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn groups_keep_first_seen_and_source_order() {
        let groups = group_by_device(vec![
            reading("1", "B"),
            reading("2", "A"),
            reading("3", "B"),
            reading("4", "A"),
            reading("5", "C"),
        ]);

        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["B", "A", "C"]);
        assert_eq!(ids(&groups["B"]), ["1", "3"]);
        assert_eq!(ids(&groups["A"]), ["2", "4"]);
        assert_eq!(ids(&groups["C"]), ["5"]);
    }

    #[test]
    fn every_reading_lands_in_exactly_one_group() {
        let input = vec![reading("1", "A"), reading("1", "A"), reading("2", "B")];
        let groups = group_by_device(input.clone());
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, input.len());
    }

    #[test]
    fn grouping_is_idempotent() {
        let input = vec![reading("1", "A"), reading("2", "B"), reading("3", "A")];
        let once = group_by_device(input.clone());
        let flattened: Vec<SensorReading> = once.values().flatten().cloned().collect();
        assert_eq!(group_by_device(flattened), once);
    }

    #[test]
    fn last_device_wins_on_duplicate_ids() {
        let first = Device {
            name: Some("old".into()),
            ..Device::placeholder("A")
        };
        let second = Device {
            name: Some("new".into()),
            ..Device::placeholder("A")
        };
        let lookup = index_devices(vec![first, second]);
        assert_eq!(lookup["A"].name.as_deref(), Some("new"));
    }

    #[test]
    fn unknown_devices_get_placeholder() {
        let known = Device {
            name: Some("Rack".into()),
            ..Device::placeholder("A")
        };
        let groups = device_groups(
            vec![reading("1", "A"), reading("2", "Z")],
            vec![known.clone()],
        );
        assert_eq!(groups[0].device, known);
        assert_eq!(groups[1].device, Device::placeholder("Z"));
        assert_eq!(groups[1].device.display_name(), "Device Z");
    }
}
