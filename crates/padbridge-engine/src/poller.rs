//! The background polling worker.
//!
//! One named thread owns every open transport handle. Each 4 ms cycle it
//! checks the running flag, rescans the bus every 250 cycles, drains the
//! rumble command channel, and reads one input report per connected slot.
//! Consumers never touch the transport; they read the slot cache and push
//! rumble commands through a bounded channel.

use crate::registry;
use crate::slots::SlotManager;
use crossbeam::channel::Receiver;
use hid_xboxone_protocol::{INIT_COMMAND, RUMBLE_COMMAND_LEN};
use padbridge_hid_common::{DeviceRef, HidCommonError, TransportHandle, UsbDeviceInfo, UsbTransport};
use padbridge_types::{ControllerFamily, MAX_SLOTS, RAW_REPORT_CAPACITY, RawReport};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Cycle period: ~250 Hz polling.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(4);

/// Bus rescan every 250 cycles (~1 s).
const RESCAN_CYCLES: u64 = 250;

/// Input read timeout, short enough to preserve the effective poll rate
/// across four slots.
const READ_TIMEOUT: Duration = Duration::from_millis(2);

/// Timeout for claim-time and output transfers, off the per-cycle input
/// budget.
const CONTROL_TIMEOUT: Duration = Duration::from_millis(16);

/// Fire-and-forget rumble request from a consumer thread.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RumbleCommand {
    pub slot: usize,
    pub left: u8,
    pub right: u8,
}

struct OpenDevice {
    handle: TransportHandle,
    device_ref: DeviceRef,
    family: ControllerFamily,
}

/// Everything the worker thread owns.
pub(crate) struct PollContext {
    pub transport: Arc<dyn UsbTransport>,
    pub slots: Arc<SlotManager>,
    pub running: Arc<AtomicBool>,
    pub rumble_rx: Receiver<RumbleCommand>,
}

struct Worker {
    ctx: PollContext,
    handles: [Option<OpenDevice>; MAX_SLOTS],
    /// Devices whose claim or init failed, keyed by slot. Retried while
    /// still enumerated, cleared once the device is gone.
    errored: [Option<DeviceRef>; MAX_SLOTS],
    rumble_seq: u8,
    cycle: u64,
    warned_transport: bool,
}

/// Worker thread entry point. Returns only after the running flag clears
/// and every handle has been released.
pub(crate) fn poll_thread_main(ctx: PollContext) {
    info!("poll worker started");
    let mut worker = Worker {
        ctx,
        handles: Default::default(),
        errored: [None; MAX_SLOTS],
        rumble_seq: 0,
        cycle: 0,
        warned_transport: false,
    };

    while worker.ctx.running.load(Ordering::Acquire) {
        let cycle_start = Instant::now();

        if worker.cycle % RESCAN_CYCLES == 0 {
            worker.rescan();
        }
        worker.drain_rumble();
        worker.poll_slots();
        worker.cycle += 1;

        let elapsed = cycle_start.elapsed();
        if elapsed < POLL_INTERVAL {
            thread::sleep(POLL_INTERVAL - elapsed);
        }
    }

    worker.teardown();
    info!("poll worker stopped");
}

impl Worker {
    /// Enumerate the bus and connect newly attached supported devices.
    fn rescan(&mut self) {
        let devices = match self.ctx.transport.enumerate() {
            Ok(devices) => {
                self.warned_transport = false;
                devices
            }
            Err(e) => {
                // Logged once per outage; the engine keeps running with
                // whatever slots it already has.
                if !self.warned_transport {
                    warn!(error = %e, "transport enumeration failed");
                    self.warned_transport = true;
                }
                return;
            }
        };

        self.reconcile_errored(&devices);

        for info in devices {
            if self.is_tracked(info.device_ref) || self.is_errored(info.device_ref) {
                continue;
            }
            let family = registry::detect(info.vendor_id, info.product_id);
            if family == ControllerFamily::None {
                trace!(
                    vendor_id = format_args!("{:04x}", info.vendor_id),
                    product_id = format_args!("{:04x}", info.product_id),
                    "skipping unsupported device"
                );
                continue;
            }
            let Some(slot) = self.ctx.slots.first_free() else {
                debug!("all slots occupied, ignoring new device");
                return;
            };
            self.connect_device(slot, family, &info);
        }
    }

    /// Retry errored slots whose device is still attached; clear slots
    /// whose device has gone away.
    fn reconcile_errored(&mut self, devices: &[UsbDeviceInfo]) {
        for slot in 0..MAX_SLOTS {
            let Some(device_ref) = self.errored.get(slot).copied().flatten() else {
                continue;
            };
            match devices.iter().find(|d| d.device_ref == device_ref) {
                Some(info) => {
                    let family = registry::detect(info.vendor_id, info.product_id);
                    debug!(slot, device_ref, "retrying errored device");
                    self.connect_device(slot, family, info);
                }
                None => {
                    if let Some(entry) = self.errored.get_mut(slot) {
                        *entry = None;
                    }
                    self.ctx.slots.disconnect(slot);
                }
            }
        }
    }

    fn is_tracked(&self, device_ref: DeviceRef) -> bool {
        self.handles
            .iter()
            .flatten()
            .any(|dev| dev.device_ref == device_ref)
    }

    fn is_errored(&self, device_ref: DeviceRef) -> bool {
        self.errored.iter().any(|entry| *entry == Some(device_ref))
    }

    fn connect_device(&mut self, slot: usize, family: ControllerFamily, info: &UsbDeviceInfo) {
        let handle = match self.ctx.transport.open(info.device_ref) {
            Ok(handle) => handle,
            Err(e) => {
                debug!(error = %e, device_ref = info.device_ref, "open failed");
                return;
            }
        };
        if let Err(e) = self.ctx.transport.claim(handle) {
            debug!(error = %e, device_ref = info.device_ref, "claim failed");
            self.ctx.transport.close(handle);
            self.fail_slot(slot, family, info);
            return;
        }
        if family.needs_init_command() {
            if let Err(e) = self.write_init(handle, family) {
                warn!(error = %e, "init command failed, device unusable");
                self.ctx.transport.close(handle);
                self.fail_slot(slot, family, info);
                return;
            }
        }
        if family == ControllerFamily::Xbox360 {
            // Cosmetic; a failed LED write does not gate the connect.
            if let Err(e) = self.write_player_led(handle, slot) {
                debug!(error = %e, slot, "player LED write failed");
            }
        }

        self.ctx
            .slots
            .connect(slot, family, info.vendor_id, info.product_id);
        if let Some(entry) = self.errored.get_mut(slot) {
            *entry = None;
        }
        if let Some(entry) = self.handles.get_mut(slot) {
            *entry = Some(OpenDevice {
                handle,
                device_ref: info.device_ref,
                family,
            });
        }
    }

    /// Claim or init failed with the device still present. The slot is
    /// parked in Error and retried on the rescan cadence.
    fn fail_slot(&mut self, slot: usize, family: ControllerFamily, info: &UsbDeviceInfo) {
        self.ctx
            .slots
            .mark_error(slot, family, info.vendor_id, info.product_id);
        if let Some(entry) = self.errored.get_mut(slot) {
            *entry = Some(info.device_ref);
        }
    }

    fn write_init(
        &self,
        handle: TransportHandle,
        family: ControllerFamily,
    ) -> Result<(), HidCommonError> {
        let endpoint = family
            .out_endpoint()
            .ok_or(HidCommonError::InvalidReport("family has no out endpoint"))?;
        self.ctx
            .transport
            .write(handle, endpoint, &INIT_COMMAND, CONTROL_TIMEOUT)?;
        Ok(())
    }

    fn write_player_led(
        &self,
        handle: TransportHandle,
        slot: usize,
    ) -> Result<(), HidCommonError> {
        let endpoint = ControllerFamily::Xbox360
            .out_endpoint()
            .ok_or(HidCommonError::InvalidReport("family has no out endpoint"))?;
        let mut report = [0u8; hid_xbox360_protocol::REPORT_SIZE_LED];
        let n = hid_xbox360_protocol::encode_player_led(slot as u8, &mut report);
        self.ctx
            .transport
            .write(handle, endpoint, &report[..n], CONTROL_TIMEOUT)?;
        Ok(())
    }

    /// One interrupt read per connected slot.
    fn poll_slots(&mut self) {
        let mut buf = [0u8; RAW_REPORT_CAPACITY];
        for slot in 0..MAX_SLOTS {
            let Some(dev) = self.handles.get(slot).and_then(Option::as_ref) else {
                continue;
            };
            let size = dev.family.report_size().min(buf.len());
            match self.ctx.transport.read(
                dev.handle,
                dev.family.in_endpoint(),
                &mut buf[..size],
                READ_TIMEOUT,
            ) {
                Ok(n) => match registry::decode_for_family(dev.family, &buf[..n]) {
                    Ok(decoded) => {
                        self.ctx
                            .slots
                            .publish(slot, RawReport::capture(&buf[..n]), decoded);
                    }
                    // Rejected report: the slot keeps its previous sample.
                    Err(e) => trace!(slot, error = %e, "report rejected"),
                },
                // No report pending this cycle.
                Err(HidCommonError::Timeout) => {}
                Err(e) => {
                    if self.ctx.transport.is_still_present(dev.handle) {
                        trace!(slot, error = %e, "transient read failure");
                    } else {
                        debug!(slot, "device absence confirmed");
                        self.teardown_slot(slot);
                    }
                }
            }
        }
    }

    /// Perform queued rumble writes on the worker thread.
    fn drain_rumble(&mut self) {
        while let Ok(cmd) = self.ctx.rumble_rx.try_recv() {
            let Some(dev) = self.handles.get(cmd.slot).and_then(Option::as_ref) else {
                continue;
            };
            let Some(endpoint) = dev.family.out_endpoint() else {
                trace!(slot = cmd.slot, "rumble ignored for input-only family");
                continue;
            };

            let result = match dev.family {
                ControllerFamily::Xbox360 => {
                    let mut report = [0u8; hid_xbox360_protocol::REPORT_SIZE_RUMBLE];
                    let n = hid_xbox360_protocol::encode_rumble(cmd.left, cmd.right, &mut report);
                    self.ctx
                        .transport
                        .write(dev.handle, endpoint, &report[..n], CONTROL_TIMEOUT)
                }
                ControllerFamily::XboxOne => {
                    self.rumble_seq = self.rumble_seq.wrapping_add(1);
                    let mut report = [0u8; RUMBLE_COMMAND_LEN];
                    let n = hid_xboxone_protocol::encode_rumble(
                        self.rumble_seq,
                        cmd.left,
                        cmd.right,
                        &mut report,
                    );
                    self.ctx
                        .transport
                        .write(dev.handle, endpoint, &report[..n], CONTROL_TIMEOUT)
                }
                ControllerFamily::SwitchInputOnly | ControllerFamily::None => continue,
            };

            if let Err(e) = result {
                debug!(slot = cmd.slot, error = %e, "rumble write failed");
            }
        }
    }

    fn teardown_slot(&mut self, slot: usize) {
        if let Some(dev) = self.handles.get_mut(slot).and_then(Option::take) {
            self.ctx.transport.close(dev.handle);
        }
        self.ctx.slots.disconnect(slot);
    }

    /// Release every handle on shutdown.
    fn teardown(&mut self) {
        for slot in 0..MAX_SLOTS {
            self.teardown_slot(slot);
        }
    }
}
