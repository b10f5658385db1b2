//! Abstract USB transport collaborator.
//!
//! The engine never touches a concrete USB stack. It polls through this
//! trait; hosts supply an implementation backed by their platform, and
//! tests use [`mock::MockTransport`].

use crate::{DeviceRef, HidCommonResult, TransportHandle, UsbDeviceInfo};
use std::time::Duration;

/// Synchronous USB transport consumed by the polling worker.
///
/// All handles returned by [`open`](UsbTransport::open) are owned
/// exclusively by the polling worker; no other component calls these
/// methods on an open handle.
pub trait UsbTransport: Send + Sync {
    /// List currently attached devices.
    fn enumerate(&self) -> HidCommonResult<Vec<UsbDeviceInfo>>;

    /// Open a device by its enumeration reference.
    fn open(&self, device_ref: DeviceRef) -> HidCommonResult<TransportHandle>;

    /// Claim the device's controller interface. Must succeed before any
    /// transfer.
    fn claim(&self, handle: TransportHandle) -> HidCommonResult<()>;

    /// Interrupt IN transfer. Returns the number of bytes read into `buf`;
    /// a timeout surfaces as `Err(HidCommonError::Timeout)`.
    fn read(
        &self,
        handle: TransportHandle,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> HidCommonResult<usize>;

    /// Interrupt OUT transfer. Returns the number of bytes written.
    fn write(
        &self,
        handle: TransportHandle,
        endpoint: u8,
        buf: &[u8],
        timeout: Duration,
    ) -> HidCommonResult<usize>;

    /// Confirmed-presence check, used to distinguish a transient read
    /// failure from an actual disconnect.
    fn is_still_present(&self, handle: TransportHandle) -> bool;

    /// Release the interface and close the handle.
    fn close(&self, handle: TransportHandle);
}

pub mod mock {
    //! In-memory transport for tests.

    use super::*;
    use crate::HidCommonError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockDevice {
        info: UsbDeviceInfo,
        read_queue: VecDeque<Vec<u8>>,
        write_history: Vec<(u8, Vec<u8>)>,
        present: bool,
        opened: bool,
        claimed: bool,
        fail_claim: bool,
    }

    impl MockDevice {
        fn new(info: UsbDeviceInfo) -> Self {
            Self {
                info,
                read_queue: VecDeque::new(),
                write_history: Vec::new(),
                present: true,
                opened: false,
                claimed: false,
                fail_claim: false,
            }
        }
    }

    /// Scriptable [`UsbTransport`]: queue input reports, inspect written
    /// output reports, and unplug devices mid-test.
    pub struct MockTransport {
        devices: Mutex<HashMap<DeviceRef, MockDevice>>,
        broken: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                devices: Mutex::new(HashMap::new()),
                broken: false,
            }
        }

        /// A transport whose enumerate always fails, for init-failure tests.
        pub fn broken() -> Self {
            Self {
                devices: Mutex::new(HashMap::new()),
                broken: true,
            }
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DeviceRef, MockDevice>> {
            self.devices.lock().unwrap_or_else(|e| e.into_inner())
        }

        /// Attach a device; it appears in the next enumerate.
        pub fn attach(&self, vendor_id: u16, product_id: u16, device_ref: DeviceRef) {
            self.lock().insert(
                device_ref,
                MockDevice::new(UsbDeviceInfo::new(vendor_id, product_id, device_ref)),
            );
        }

        /// Unplug a device: reads fail and `is_still_present` reports false.
        pub fn detach(&self, device_ref: DeviceRef) {
            if let Some(dev) = self.lock().get_mut(&device_ref) {
                dev.present = false;
            }
        }

        /// Make the next claim on this device fail.
        pub fn fail_claim(&self, device_ref: DeviceRef) {
            if let Some(dev) = self.lock().get_mut(&device_ref) {
                dev.fail_claim = true;
            }
        }

        /// Queue an input report to be returned by the next read.
        pub fn queue_report(&self, device_ref: DeviceRef, data: &[u8]) {
            if let Some(dev) = self.lock().get_mut(&device_ref) {
                dev.read_queue.push_back(data.to_vec());
            }
        }

        /// All output reports written to this device, as (endpoint, bytes).
        pub fn write_history(&self, device_ref: DeviceRef) -> Vec<(u8, Vec<u8>)> {
            self.lock()
                .get(&device_ref)
                .map(|dev| dev.write_history.clone())
                .unwrap_or_default()
        }

        pub fn is_claimed(&self, device_ref: DeviceRef) -> bool {
            self.lock().get(&device_ref).is_some_and(|dev| dev.claimed)
        }

        pub fn is_open(&self, device_ref: DeviceRef) -> bool {
            self.lock().get(&device_ref).is_some_and(|dev| dev.opened)
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UsbTransport for MockTransport {
        fn enumerate(&self) -> HidCommonResult<Vec<UsbDeviceInfo>> {
            if self.broken {
                return Err(HidCommonError::TransportUnavailable(
                    "mock transport configured as broken".to_string(),
                ));
            }
            Ok(self
                .lock()
                .values()
                .filter(|dev| dev.present)
                .map(|dev| dev.info.clone())
                .collect())
        }

        fn open(&self, device_ref: DeviceRef) -> HidCommonResult<TransportHandle> {
            let mut devices = self.lock();
            let dev = devices
                .get_mut(&device_ref)
                .filter(|dev| dev.present)
                .ok_or(HidCommonError::DeviceNotFound(device_ref))?;
            dev.opened = true;
            // Handle value doubles as the device ref; real transports assign
            // their own opaque values.
            Ok(device_ref)
        }

        fn claim(&self, handle: TransportHandle) -> HidCommonResult<()> {
            let mut devices = self.lock();
            let dev = devices
                .get_mut(&handle)
                .ok_or(HidCommonError::DeviceNotFound(handle))?;
            if dev.fail_claim {
                dev.fail_claim = false;
                return Err(HidCommonError::ClaimError("interface busy".to_string()));
            }
            dev.claimed = true;
            Ok(())
        }

        fn read(
            &self,
            handle: TransportHandle,
            _endpoint: u8,
            buf: &mut [u8],
            _timeout: Duration,
        ) -> HidCommonResult<usize> {
            let mut devices = self.lock();
            let dev = devices
                .get_mut(&handle)
                .ok_or(HidCommonError::DeviceNotFound(handle))?;
            if !dev.present {
                return Err(HidCommonError::Disconnected);
            }
            match dev.read_queue.pop_front() {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                // No data pending: a real interrupt transfer times out.
                None => Err(HidCommonError::Timeout),
            }
        }

        fn write(
            &self,
            handle: TransportHandle,
            endpoint: u8,
            buf: &[u8],
            _timeout: Duration,
        ) -> HidCommonResult<usize> {
            let mut devices = self.lock();
            let dev = devices
                .get_mut(&handle)
                .ok_or(HidCommonError::DeviceNotFound(handle))?;
            if !dev.present {
                return Err(HidCommonError::Disconnected);
            }
            dev.write_history.push((endpoint, buf.to_vec()));
            Ok(buf.len())
        }

        fn is_still_present(&self, handle: TransportHandle) -> bool {
            self.lock().get(&handle).is_some_and(|dev| dev.present)
        }

        fn close(&self, handle: TransportHandle) {
            if let Some(dev) = self.lock().get_mut(&handle) {
                dev.opened = false;
                dev.claimed = false;
            }
        }
    }
}
