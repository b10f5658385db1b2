//! Per-slot controller state cache.
//!
//! The polling worker is the only writer; any number of threads read
//! translated samples concurrently. Each slot is guarded by its own
//! [`parking_lot::Mutex`] and replaced atomically, so a reader always
//! observes a complete publish, never a torn one. Sequence numbers are
//! monotonic per slot; there is no ordering between slots.

use padbridge_types::{CanonicalState, ControllerFamily, MAX_SLOTS, RawReport};
use parking_lot::Mutex;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of one physical slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    /// Device present but unusable (claim or init failed). Cleared by the
    /// next successful connect or confirmed removal.
    Error,
}

#[derive(Debug, Default)]
struct SlotState {
    family: ControllerFamily,
    connection: ConnectionState,
    vendor_id: u16,
    product_id: u16,
    last_raw: Option<RawReport>,
    last_decoded: Option<CanonicalState>,
    seq: u64,
    last_update_ns: u64,
}

/// A consistent snapshot of one slot's most recent decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSample {
    pub decoded: CanonicalState,
    pub seq: u64,
    pub timestamp_ns: u64,
}

/// Identity and lifecycle snapshot of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    pub family: ControllerFamily,
    pub connection: ConnectionState,
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Fixed-size cache of [`MAX_SLOTS`] controller slots.
pub struct SlotManager {
    slots: [Mutex<SlotState>; MAX_SLOTS],
    epoch: Instant,
}

impl SlotManager {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds since this manager's epoch. Used to stamp both published
    /// samples and synthesized neutral reads so all timestamps share one
    /// clock.
    pub fn now_ns(&self) -> u64 {
        self.epoch
            .elapsed()
            .as_nanos()
            .min(u128::from(u64::MAX)) as u64
    }

    /// Transition a slot to Connected for a newly claimed device. The
    /// family is fixed until the matching [`disconnect`](Self::disconnect).
    pub fn connect(&self, slot: usize, family: ControllerFamily, vendor_id: u16, product_id: u16) {
        let Some(entry) = self.slots.get(slot) else {
            return;
        };
        let mut state = entry.lock();
        *state = SlotState {
            family,
            connection: ConnectionState::Connected,
            vendor_id,
            product_id,
            ..SlotState::default()
        };
        info!(
            slot,
            family = family.display_name(),
            vendor_id = format_args!("{vendor_id:04x}"),
            product_id = format_args!("{product_id:04x}"),
            "controller connected"
        );
    }

    /// Park a slot in Error after a claim or init failure. Identity is
    /// recorded for diagnostics; no samples are served until the next
    /// successful connect or confirmed removal replaces the state.
    pub fn mark_error(
        &self,
        slot: usize,
        family: ControllerFamily,
        vendor_id: u16,
        product_id: u16,
    ) {
        let Some(entry) = self.slots.get(slot) else {
            return;
        };
        let mut state = entry.lock();
        *state = SlotState {
            family,
            connection: ConnectionState::Error,
            vendor_id,
            product_id,
            ..SlotState::default()
        };
        warn!(
            slot,
            family = family.display_name(),
            vendor_id = format_args!("{vendor_id:04x}"),
            product_id = format_args!("{product_id:04x}"),
            "controller unusable"
        );
    }

    /// Transition a slot to Disconnected on confirmed absence, clearing
    /// all cached samples.
    pub fn disconnect(&self, slot: usize) {
        let Some(entry) = self.slots.get(slot) else {
            return;
        };
        let mut state = entry.lock();
        if state.connection != ConnectionState::Disconnected {
            debug!(slot, family = state.family.display_name(), "controller disconnected");
        }
        *state = SlotState::default();
    }

    /// Publish one decoded sample. Single-writer: only the polling worker
    /// calls this. Returns the new sequence number, or `None` if the slot
    /// is not Connected.
    pub fn publish(
        &self,
        slot: usize,
        raw: RawReport,
        decoded: CanonicalState,
    ) -> Option<u64> {
        let entry = self.slots.get(slot)?;
        let mut state = entry.lock();
        if state.connection != ConnectionState::Connected {
            return None;
        }
        state.seq = state.seq.wrapping_add(1);
        state.last_raw = Some(raw);
        state.last_decoded = Some(decoded);
        state.last_update_ns = self.now_ns();
        Some(state.seq)
    }

    /// Read the most recent sample. `None` until at least one valid decode
    /// has been published since the slot connected.
    pub fn read(&self, slot: usize) -> Option<SlotSample> {
        let entry = self.slots.get(slot)?;
        let state = entry.lock();
        if state.connection != ConnectionState::Connected {
            return None;
        }
        state.last_decoded.map(|decoded| SlotSample {
            decoded,
            seq: state.seq,
            timestamp_ns: state.last_update_ns,
        })
    }

    /// The raw bytes behind the most recent sample, for diagnostics.
    pub fn last_raw(&self, slot: usize) -> Option<RawReport> {
        self.slots.get(slot)?.lock().last_raw
    }

    pub fn info(&self, slot: usize) -> Option<SlotInfo> {
        let entry = self.slots.get(slot)?;
        let state = entry.lock();
        Some(SlotInfo {
            family: state.family,
            connection: state.connection,
            vendor_id: state.vendor_id,
            product_id: state.product_id,
        })
    }

    pub fn is_connected(&self, slot: usize) -> bool {
        self.slots
            .get(slot)
            .is_some_and(|entry| entry.lock().connection == ConnectionState::Connected)
    }

    /// Lowest-indexed slot currently Connected.
    pub fn first_connected(&self) -> Option<usize> {
        (0..MAX_SLOTS).find(|&slot| self.is_connected(slot))
    }

    /// Lowest-indexed slot currently Disconnected, for new devices. Error
    /// slots are not free; their device is still attached.
    pub fn first_free(&self) -> Option<usize> {
        (0..MAX_SLOTS).find(|&slot| {
            self.slots
                .get(slot)
                .is_some_and(|entry| entry.lock().connection == ConnectionState::Disconnected)
        })
    }

    pub fn connected_count(&self) -> usize {
        (0..MAX_SLOTS).filter(|&slot| self.is_connected(slot)).count()
    }
}

impl Default for SlotManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(buttons: u32) -> CanonicalState {
        CanonicalState {
            buttons,
            ..CanonicalState::neutral()
        }
    }

    #[test]
    fn test_read_before_first_publish_is_none() {
        let slots = SlotManager::new();
        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);
        assert!(slots.read(0).is_none());
    }

    #[test]
    fn test_publish_then_read() {
        let slots = SlotManager::new();
        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);

        let seq = slots.publish(0, RawReport::capture(&[0u8; 20]), sample(1));
        assert_eq!(seq, Some(1));

        let read = slots.read(0).expect("sample");
        assert_eq!(read.decoded.buttons, 1);
        assert_eq!(read.seq, 1);
    }

    #[test]
    fn test_seq_is_monotonic() {
        let slots = SlotManager::new();
        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);

        let mut last = 0;
        for i in 0..100 {
            let seq = slots
                .publish(0, RawReport::capture(&[0u8; 20]), sample(i))
                .expect("connected");
            assert!(seq > last);
            last = seq;
        }
    }

    #[test]
    fn test_publish_to_disconnected_slot_is_dropped() {
        let slots = SlotManager::new();
        assert_eq!(slots.publish(0, RawReport::capture(&[0u8; 20]), sample(1)), None);
        assert!(slots.read(0).is_none());
    }

    #[test]
    fn test_disconnect_clears_cached_samples() {
        let slots = SlotManager::new();
        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);
        slots.publish(0, RawReport::capture(&[0u8; 20]), sample(1));

        slots.disconnect(0);
        assert!(slots.read(0).is_none());
        assert!(slots.last_raw(0).is_none());

        // Reconnect starts from a fresh sequence.
        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);
        let seq = slots.publish(0, RawReport::capture(&[0u8; 20]), sample(2));
        assert_eq!(seq, Some(1));
    }

    #[test]
    fn test_slot_accounting() {
        let slots = SlotManager::new();
        assert_eq!(slots.first_free(), Some(0));
        assert_eq!(slots.first_connected(), None);

        slots.connect(0, ControllerFamily::Xbox360, 0x045E, 0x028E);
        slots.connect(2, ControllerFamily::SwitchInputOnly, 0x0E6F, 0x0180);
        assert_eq!(slots.first_free(), Some(1));
        assert_eq!(slots.first_connected(), Some(0));
        assert_eq!(slots.connected_count(), 2);

        slots.disconnect(0);
        assert_eq!(slots.first_connected(), Some(2));
    }

    #[test]
    fn test_error_state_hides_samples() {
        let slots = SlotManager::new();
        slots.connect(1, ControllerFamily::XboxOne, 0x045E, 0x0B12);
        slots.publish(1, RawReport::capture(&[0u8; 18]), sample(4));
        slots.mark_error(1, ControllerFamily::XboxOne, 0x045E, 0x0B12);

        assert!(slots.read(1).is_none());
        assert!(!slots.is_connected(1));
        let info = slots.info(1).expect("slot in range");
        assert_eq!(info.connection, ConnectionState::Error);
        // Identity survives for diagnostics.
        assert_eq!(info.product_id, 0x0B12);
    }

    #[test]
    fn test_out_of_range_slot() {
        let slots = SlotManager::new();
        assert!(slots.read(MAX_SLOTS).is_none());
        assert!(slots.info(MAX_SLOTS).is_none());
        assert_eq!(slots.publish(MAX_SLOTS, RawReport::capture(&[]), sample(0)), None);
    }
}
