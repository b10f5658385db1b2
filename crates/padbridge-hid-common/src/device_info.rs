//! Device identification types.

use serde::{Deserialize, Serialize};

/// An opaque reference to an enumerated but not-yet-opened device,
/// assigned by the transport.
pub type DeviceRef = u64;

/// An open device handle owned exclusively by the polling worker.
pub type TransportHandle = u64;

/// Identification of an enumerated USB device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Transport-assigned reference used to open the device.
    pub device_ref: DeviceRef,
}

impl UsbDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, device_ref: DeviceRef) -> Self {
        Self {
            vendor_id,
            product_id,
            device_ref,
        }
    }
}
