//! PadBridge runtime engine.
//!
//! Ties the pieces together: the device registry classifies enumerated USB
//! devices into controller families, a single polling worker reads and
//! decodes input reports into the per-slot cache, consumers read translated
//! [`PadOutput`] samples through the [`PadBridge`] context, and the virtual
//! multiplexer exposes an optional second controller identity backed by a
//! physical slot.

#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod registry;
pub mod slots;
pub mod virtual_mux;

mod poller;

pub use registry::{DecodeError, decode_for_family, detect};
pub use slots::{ConnectionState, SlotInfo, SlotManager, SlotSample};
pub use virtual_mux::{
    PadIdentity, VIRTUAL_HANDLE_BASE, VirtualHandleError, VirtualMux, VirtualPadInfo,
};

use crate::poller::{PollContext, RumbleCommand};
use crossbeam::channel::{Sender, TrySendError};
use padbridge_hid_common::UsbTransport;
use padbridge_translator::{TranslatorConfig, translate};
use padbridge_types::{MAX_SLOTS, PadOutput};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{info, warn};

/// Capacity of the rumble command channel. Commands past this are dropped;
/// rumble is best-effort by contract.
const RUMBLE_CHANNEL_CAPACITY: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Engine already running")]
    AlreadyRunning,

    #[error("Engine not running")]
    NotRunning,

    #[error("Invalid slot index: {0} (max {max})", max = MAX_SLOTS - 1)]
    InvalidSlot(usize),

    #[error("Failed to spawn poll worker: {0}")]
    SpawnError(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub translator: TranslatorConfig,
}

/// Process-scoped engine context.
///
/// Owns the slot cache, translator configuration, virtual multiplexer, and
/// the polling worker lifecycle. All read-side methods take `&self` and are
/// safe to call from any thread while the worker runs.
pub struct PadBridge {
    transport: Arc<dyn UsbTransport>,
    slots: Arc<SlotManager>,
    config: Arc<RwLock<TranslatorConfig>>,
    mux: VirtualMux,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    rumble_tx: Option<Sender<RumbleCommand>>,
}

impl PadBridge {
    pub fn new(transport: Arc<dyn UsbTransport>, config: BridgeConfig) -> Self {
        let slots = Arc::new(SlotManager::new());
        let translator = Arc::new(RwLock::new(config.translator));
        let mux = VirtualMux::new(Arc::clone(&slots), Arc::clone(&translator));
        Self {
            transport,
            slots,
            config: translator,
            mux,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            rumble_tx: None,
        }
    }

    /// Start the polling worker.
    ///
    /// A failing transport is not fatal: the worker logs the outage once
    /// and runs with zero slots until enumeration recovers.
    ///
    /// # Errors
    ///
    /// Fails on double start or if the worker thread cannot be spawned.
    pub fn start(&mut self) -> EngineResult<()> {
        if self.running.load(Ordering::Acquire) {
            return Err(EngineError::AlreadyRunning);
        }

        let (rumble_tx, rumble_rx) = crossbeam::channel::bounded(RUMBLE_CHANNEL_CAPACITY);
        let ctx = PollContext {
            transport: Arc::clone(&self.transport),
            slots: Arc::clone(&self.slots),
            running: Arc::clone(&self.running),
            rumble_rx,
        };

        self.running.store(true, Ordering::Release);
        let worker = thread::Builder::new()
            .name("padbridge-poll".to_string())
            .spawn(move || poller::poll_thread_main(ctx))
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                EngineError::SpawnError(e.to_string())
            })?;

        self.worker = Some(worker);
        self.rumble_tx = Some(rumble_tx);
        info!("engine started");
        Ok(())
    }

    /// Stop the polling worker: cooperative signal, then join. Handles are
    /// released by the worker before it exits.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        self.rumble_tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("poll worker panicked");
            }
        }
        info!("engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Read the translated output for a physical slot.
    ///
    /// Disconnected or not-yet-sampled slots yield a neutral sample stamped
    /// with the current time, so callers always get a well-formed reading.
    pub fn read_pad(&self, slot: usize) -> EngineResult<PadOutput> {
        if slot >= MAX_SLOTS {
            return Err(EngineError::InvalidSlot(slot));
        }
        let Some(sample) = self.slots.read(slot) else {
            return Ok(PadOutput {
                timestamp_ns: self.slots.now_ns(),
                ..PadOutput::neutral()
            });
        };

        let config = *self.config.read();
        let mut out = translate(&sample.decoded, &config);
        out.connected = true;
        out.seq = sample.seq;
        out.timestamp_ns = sample.timestamp_ns;
        Ok(out)
    }

    /// Read the raw cached sample for a slot, untranslated.
    pub fn read_slot(&self, slot: usize) -> Option<SlotSample> {
        self.slots.read(slot)
    }

    pub fn slot_info(&self, slot: usize) -> Option<SlotInfo> {
        self.slots.info(slot)
    }

    pub fn connected_count(&self) -> usize {
        self.slots.connected_count()
    }

    /// Queue a rumble command; the worker performs the write. Fire and
    /// forget: a full queue drops the command.
    pub fn set_rumble(&self, slot: usize, left: u8, right: u8) -> EngineResult<()> {
        if slot >= MAX_SLOTS {
            return Err(EngineError::InvalidSlot(slot));
        }
        let Some(tx) = self.rumble_tx.as_ref() else {
            return Err(EngineError::NotRunning);
        };
        match tx.try_send(RumbleCommand { slot, left, right }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(EngineError::NotRunning),
        }
    }

    pub fn translator_config(&self) -> TranslatorConfig {
        *self.config.read()
    }

    /// Replace the translator configuration; applies from the next
    /// translation on.
    pub fn set_translator_config(&self, config: TranslatorConfig) {
        *self.config.write() = config;
    }

    // Virtual multiplexer surface.

    pub fn virtual_open(&self, identity: PadIdentity) -> Result<u64, VirtualHandleError> {
        self.mux.open(identity)
    }

    pub fn virtual_read(&self, handle: u64) -> Result<PadOutput, VirtualHandleError> {
        self.mux.read(handle)
    }

    pub fn virtual_close(&self, handle: u64) -> Result<(), VirtualHandleError> {
        self.mux.close(handle)
    }

    pub fn virtual_get_info(&self, handle: u64) -> Result<VirtualPadInfo, VirtualHandleError> {
        self.mux.get_info(handle)
    }

    pub fn note_primary_identity(&self, identity: PadIdentity) {
        self.mux.note_primary_identity(identity)
    }
}

impl Drop for PadBridge {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("engine dropped while running, forcing stop");
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padbridge_hid_common::mock::MockTransport;

    #[test]
    fn test_double_start_rejected() {
        let mut bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        bridge.start().expect("start");
        assert_eq!(bridge.start(), Err(EngineError::AlreadyRunning));
        bridge.stop();
        assert!(!bridge.is_running());
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let mut bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        bridge.stop();
        assert!(!bridge.is_running());
    }

    #[test]
    fn test_read_pad_before_start_is_neutral() {
        let bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        let out = bridge.read_pad(0).expect("in range");
        assert!(!out.connected);
        assert_eq!(out.left_x, 128);
        assert_eq!(out.seq, 0);
    }

    #[test]
    fn test_invalid_slot_rejected() {
        let bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        assert_eq!(bridge.read_pad(MAX_SLOTS), Err(EngineError::InvalidSlot(4)));
        assert_eq!(
            bridge.set_rumble(MAX_SLOTS, 0, 0),
            Err(EngineError::InvalidSlot(4))
        );
    }

    #[test]
    fn test_rumble_requires_running_engine() {
        let bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        assert_eq!(bridge.set_rumble(0, 10, 10), Err(EngineError::NotRunning));
    }

    #[test]
    fn test_config_swap_applies() {
        let bridge = PadBridge::new(Arc::new(MockTransport::new()), BridgeConfig::default());
        assert_eq!(bridge.translator_config().stick_deadzone, 15);

        let mut config = bridge.translator_config();
        config.stick_deadzone = 40;
        bridge.set_translator_config(config);
        assert_eq!(bridge.translator_config().stick_deadzone, 40);
    }

    #[test]
    fn test_bridge_config_deserializes_with_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"translator": {"swap_ab": true}}"#).expect("valid");
        assert!(config.translator.swap_ab);
        assert_eq!(config.translator.trigger_threshold, 30);

        let empty: BridgeConfig = serde_json::from_str("{}").expect("valid");
        assert_eq!(empty, BridgeConfig::default());
    }
}
