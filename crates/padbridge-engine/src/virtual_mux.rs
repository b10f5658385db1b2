//! Virtual second-controller multiplexer.
//!
//! Exposes one synthetic controller identity backed by a physical slot.
//! At most one virtual handle exists at a time; it binds an identity and a
//! backing slot on the first successful open and keeps both until closed.
//! Binding is strictly first come, first served. There is no way to choose
//! which identity wins when several could qualify; whichever asks first
//! gets the pad. Callers whose open does not apply fall through to their
//! native handling.

use crate::slots::SlotManager;
use padbridge_translator::{TranslatorConfig, translate};
use padbridge_types::PadOutput;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Base value for synthetic handles, disjoint from any real handle range.
pub const VIRTUAL_HANDLE_BASE: u64 = 1000;

/// Opaque caller identity (for example, a per-user id). The mux only
/// compares identities, never interprets them.
pub type PadIdentity = u32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VirtualHandleError {
    /// The open does not apply: no physical pad, identity already known as
    /// the primary, or a different identity holds the handle. The caller
    /// proceeds with its native path.
    #[error("Virtual handle not applicable for this open")]
    NotApplicable,

    /// The handle value was never issued by this mux.
    #[error("Unknown virtual handle: {0}")]
    UnknownHandle(u64),
}

/// Fixed synthetic capability descriptor reported for the virtual pad.
/// No touch surface; resolution fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualPadInfo {
    pub connected: bool,
    pub touchpad: bool,
    pub touch_resolution_x: u16,
    pub touch_resolution_y: u16,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    identity: PadIdentity,
    slot: usize,
}

#[derive(Debug, Default)]
struct MuxState {
    binding: Option<Binding>,
    primary_identity: Option<PadIdentity>,
}

/// The one-handle virtual controller state machine (Closed -> Open ->
/// Closed).
pub struct VirtualMux {
    state: Mutex<MuxState>,
    slots: Arc<SlotManager>,
    config: Arc<RwLock<TranslatorConfig>>,
}

impl VirtualMux {
    pub fn new(slots: Arc<SlotManager>, config: Arc<RwLock<TranslatorConfig>>) -> Self {
        Self {
            state: Mutex::new(MuxState::default()),
            slots,
            config,
        }
    }

    /// Record the host's primary controller identity. Opens for this
    /// identity always fall through to native handling.
    pub fn note_primary_identity(&self, identity: PadIdentity) {
        self.state.lock().primary_identity = Some(identity);
    }

    /// Try to open the virtual controller for `identity`.
    ///
    /// First caller wins the binding; re-opening with the bound identity
    /// returns the same handle. Requires a connected physical pad at bind
    /// time.
    ///
    /// # Errors
    ///
    /// `NotApplicable` when the open should fall through to the caller's
    /// native path.
    pub fn open(&self, identity: PadIdentity) -> Result<u64, VirtualHandleError> {
        let mut state = self.state.lock();

        if let Some(binding) = state.binding {
            if binding.identity == identity {
                return Ok(VIRTUAL_HANDLE_BASE);
            }
            // Another identity holds the one handle.
            return Err(VirtualHandleError::NotApplicable);
        }

        if state.primary_identity == Some(identity) {
            return Err(VirtualHandleError::NotApplicable);
        }

        let Some(slot) = self.slots.first_connected() else {
            return Err(VirtualHandleError::NotApplicable);
        };

        state.binding = Some(Binding { identity, slot });
        info!(identity, slot, "virtual controller opened");
        Ok(VIRTUAL_HANDLE_BASE)
    }

    /// Read the virtual controller's current output.
    ///
    /// While the backing slot has a decoded sample this is the translator's
    /// output for it; otherwise a neutral sample stamped with the current
    /// time, so callers always receive a well-formed reading.
    pub fn read(&self, handle: u64) -> Result<PadOutput, VirtualHandleError> {
        self.check_handle(handle)?;
        let binding = self.state.lock().binding;

        let Some(binding) = binding else {
            return Ok(self.neutral_now());
        };
        let Some(sample) = self.slots.read(binding.slot) else {
            return Ok(self.neutral_now());
        };

        let config = *self.config.read();
        let mut out = translate(&sample.decoded, &config);
        out.connected = true;
        out.seq = sample.seq;
        out.timestamp_ns = sample.timestamp_ns;
        Ok(out)
    }

    /// Close the handle and clear the binding; a later open may bind a
    /// different identity.
    pub fn close(&self, handle: u64) -> Result<(), VirtualHandleError> {
        self.check_handle(handle)?;
        let mut state = self.state.lock();
        if let Some(binding) = state.binding.take() {
            debug!(identity = binding.identity, "virtual controller closed");
        }
        Ok(())
    }

    pub fn get_info(&self, handle: u64) -> Result<VirtualPadInfo, VirtualHandleError> {
        self.check_handle(handle)?;
        let connected = self
            .state
            .lock()
            .binding
            .is_some_and(|binding| self.slots.is_connected(binding.slot));
        Ok(VirtualPadInfo {
            connected,
            touchpad: false,
            touch_resolution_x: 0,
            touch_resolution_y: 0,
        })
    }

    /// Whether a virtual handle is currently open.
    pub fn is_open(&self) -> bool {
        self.state.lock().binding.is_some()
    }

    fn check_handle(&self, handle: u64) -> Result<(), VirtualHandleError> {
        if handle == VIRTUAL_HANDLE_BASE {
            Ok(())
        } else {
            Err(VirtualHandleError::UnknownHandle(handle))
        }
    }

    fn neutral_now(&self) -> PadOutput {
        PadOutput {
            timestamp_ns: self.slots.now_ns(),
            ..PadOutput::neutral()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padbridge_types::{CanonicalState, ControllerFamily, RawReport, buttons};

    fn mux_with_slots() -> (VirtualMux, Arc<SlotManager>) {
        let slots = Arc::new(SlotManager::new());
        let config = Arc::new(RwLock::new(TranslatorConfig::default()));
        (VirtualMux::new(Arc::clone(&slots), config), slots)
    }

    fn connect_and_publish(slots: &SlotManager, slot: usize, state: CanonicalState) {
        slots.connect(slot, ControllerFamily::Xbox360, 0x045E, 0x028E);
        slots.publish(slot, RawReport::capture(&[0u8; 20]), state);
    }

    #[test]
    fn test_open_without_pad_is_not_applicable() {
        let (mux, _slots) = mux_with_slots();
        assert_eq!(mux.open(7), Err(VirtualHandleError::NotApplicable));
        assert!(!mux.is_open());
    }

    #[test]
    fn test_open_binds_first_connected_slot() {
        let (mux, slots) = mux_with_slots();
        connect_and_publish(&slots, 1, CanonicalState::neutral());

        let handle = mux.open(7).expect("open");
        assert_eq!(handle, VIRTUAL_HANDLE_BASE);
        assert!(mux.is_open());

        // Same identity reuses the handle.
        assert_eq!(mux.open(7), Ok(handle));
        // A different identity cannot steal it.
        assert_eq!(mux.open(8), Err(VirtualHandleError::NotApplicable));
    }

    #[test]
    fn test_primary_identity_falls_through() {
        let (mux, slots) = mux_with_slots();
        connect_and_publish(&slots, 0, CanonicalState::neutral());

        mux.note_primary_identity(1);
        assert_eq!(mux.open(1), Err(VirtualHandleError::NotApplicable));
        assert!(mux.open(2).is_ok());
    }

    #[test]
    fn test_close_permits_rebinding() {
        let (mux, slots) = mux_with_slots();
        connect_and_publish(&slots, 0, CanonicalState::neutral());

        let handle = mux.open(7).expect("open");
        mux.close(handle).expect("close");
        assert!(!mux.is_open());

        // A different identity can now take the handle.
        assert!(mux.open(8).is_ok());
    }

    #[test]
    fn test_read_is_translated_and_stamped() {
        let (mux, slots) = mux_with_slots();
        let state = CanonicalState {
            buttons: buttons::SOUTH,
            trigger_right: 200,
            ..CanonicalState::neutral()
        };
        connect_and_publish(&slots, 0, state);

        let handle = mux.open(7).expect("open");
        let out = mux.read(handle).expect("read");
        assert!(out.connected);
        assert_eq!(out.seq, 1);
        assert_eq!(out.buttons & buttons::SOUTH, buttons::SOUTH);
        // Trigger above default threshold synthesizes the digital bit.
        assert_eq!(out.buttons & buttons::R2, buttons::R2);
    }

    #[test]
    fn test_read_after_disconnect_is_neutral() {
        let (mux, slots) = mux_with_slots();
        connect_and_publish(&slots, 0, CanonicalState::neutral());
        let handle = mux.open(7).expect("open");

        slots.disconnect(0);
        let out = mux.read(handle).expect("read");
        assert!(!out.connected);
        assert_eq!(out.buttons, 0);
        assert_eq!(out.left_x, 128);

        let info = mux.get_info(handle).expect("info");
        assert!(!info.connected);
        assert!(!info.touchpad);
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let (mux, _slots) = mux_with_slots();
        assert_eq!(mux.read(999), Err(VirtualHandleError::UnknownHandle(999)));
        assert_eq!(mux.close(0), Err(VirtualHandleError::UnknownHandle(0)));
    }
}
