//! Opaque device information contributed by tasks.

use serde::{Deserialize, Serialize};

/// Device payloads attached by tasks during device propagation.
///
/// The service never inspects the entries; it only concatenates them in task
/// order when the device-propagation barrier passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub devices: Vec<Vec<u8>>,
}

impl DeviceInfo {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Appends another aggregate's entries, preserving their order.
    pub fn merge(&mut self, other: &DeviceInfo) {
        self.devices.extend(other.devices.iter().cloned());
    }
}

impl From<Vec<Vec<u8>>> for DeviceInfo {
    fn from(devices: Vec<Vec<u8>>) -> Self {
        Self { devices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_preserves_order() {
        let mut all = DeviceInfo::default();
        all.merge(&DeviceInfo::from(vec![b"a".to_vec()]));
        all.merge(&DeviceInfo::from(vec![b"b".to_vec(), b"c".to_vec()]));
        assert_eq!(
            all.devices,
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
    }
}
