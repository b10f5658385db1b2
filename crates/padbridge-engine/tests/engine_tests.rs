//! End-to-end engine tests against the in-memory mock transport.

use hid_xboxone_protocol::INIT_COMMAND;
use padbridge_engine::{BridgeConfig, ConnectionState, PadBridge, VirtualHandleError};
use padbridge_hid_common::mock::MockTransport;
use padbridge_types::buttons;
use std::sync::Arc;
use std::time::{Duration, Instant};

const WAIT_BUDGET: Duration = Duration::from_secs(2);

fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT_BUDGET;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// A 20-byte XUSB input report with the given native button mask.
fn xusb_report(native_buttons: u16) -> [u8; 20] {
    let mut report = [0u8; 20];
    report[1] = 0x14;
    report[2..4].copy_from_slice(&native_buttons.to_le_bytes());
    report
}

fn bridge_with(transport: &Arc<MockTransport>) -> PadBridge {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();
    let transport: Arc<MockTransport> = Arc::clone(transport);
    PadBridge::new(transport, BridgeConfig::default())
}

#[test]
fn test_xbox360_device_end_to_end() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x028E, 1);
    transport.queue_report(1, &xusb_report(1 << 12)); // A button

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");

    wait_until("decoded sample", || {
        bridge.read_slot(0).is_some_and(|s| s.seq >= 1)
    });

    let out = bridge.read_pad(0).expect("in range");
    assert!(out.connected);
    assert_eq!(out.buttons & buttons::SOUTH, buttons::SOUTH);
    assert!(out.timestamp_ns > 0);
    assert!(transport.is_claimed(1));
    // Slot 0 got its player-1 LED on connect.
    assert!(
        transport
            .write_history(1)
            .contains(&(0x01, vec![0x01, 0x03, 0x06]))
    );

    bridge.stop();
    // Worker released its handle on the way out.
    assert!(!transport.is_open(1));
}

#[test]
fn test_xboxone_init_command_written_after_claim() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x0B12, 1);

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");

    wait_until("connect", || bridge.connected_count() == 1);

    let history = transport.write_history(1);
    assert_eq!(history.first(), Some(&(0x01, INIT_COMMAND.to_vec())));

    bridge.stop();
}

#[test]
fn test_detach_confirms_absence_and_tears_down() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x028E, 1);
    transport.queue_report(1, &xusb_report(0));

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");
    wait_until("connect", || bridge.connected_count() == 1);

    transport.detach(1);
    wait_until("teardown", || bridge.connected_count() == 0);

    // Cached samples cleared; reads are neutral again.
    let out = bridge.read_pad(0).expect("in range");
    assert!(!out.connected);
    assert_eq!(out.seq, 0);

    bridge.stop();
}

#[test]
fn test_broken_transport_runs_with_zero_slots() {
    let transport = Arc::new(MockTransport::broken());
    let mut bridge = bridge_with(&transport);

    bridge.start().expect("transport failure is non-fatal");
    std::thread::sleep(Duration::from_millis(30));

    assert!(bridge.is_running());
    assert_eq!(bridge.connected_count(), 0);
    let out = bridge.read_pad(0).expect("in range");
    assert!(!out.connected);

    bridge.stop();
}

#[test]
fn test_failed_claim_parks_slot_in_error_then_recovers() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x028E, 1);
    transport.fail_claim(1);

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");

    wait_until("error state", || {
        bridge
            .slot_info(0)
            .is_some_and(|info| info.connection == ConnectionState::Error)
    });
    // Identity is recorded but no samples are served and the handle is
    // released.
    assert!(bridge.slot_info(0).is_some_and(|info| info.product_id == 0x028E));
    assert_eq!(bridge.connected_count(), 0);
    assert!(!transport.is_claimed(1));
    assert!(!transport.is_open(1));
    let out = bridge.read_pad(0).expect("in range");
    assert!(!out.connected);

    // The mock claim failure is one-shot, so the next rescan brings the
    // same slot up Connected.
    wait_until("recovery", || bridge.connected_count() == 1);
    assert!(
        bridge
            .slot_info(0)
            .is_some_and(|info| info.connection == ConnectionState::Connected)
    );

    bridge.stop();
}

#[test]
fn test_unsupported_device_is_skipped() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x1234, 0x5678, 1);

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");
    std::thread::sleep(Duration::from_millis(30));

    assert_eq!(bridge.connected_count(), 0);
    assert!(!transport.is_open(1));

    bridge.stop();
}

#[test]
fn test_rumble_command_reaches_device() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x028E, 1);

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");
    wait_until("connect", || bridge.connected_count() == 1);

    bridge.set_rumble(0, 100, 50).expect("queue rumble");
    wait_until("rumble write", || {
        transport
            .write_history(1)
            .iter()
            .any(|(endpoint, data)| *endpoint == 0x01 && data.get(3) == Some(&100))
    });

    let history = transport.write_history(1);
    let rumble = history
        .iter()
        .find(|(_, data)| data.first() == Some(&0x00))
        .expect("rumble report present");
    assert_eq!(rumble.1, vec![0x00, 0x08, 0x00, 100, 50, 0x00, 0x00, 0x00]);

    bridge.stop();
}

#[test]
fn test_rejected_report_keeps_previous_sample() {
    let transport = Arc::new(MockTransport::new());
    transport.attach(0x045E, 0x028E, 1);
    transport.queue_report(1, &xusb_report(1 << 12));

    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");
    wait_until("first sample", || {
        bridge.read_slot(0).is_some_and(|s| s.seq == 1)
    });

    // Garbage header: decoder rejects, cache must not move.
    transport.queue_report(1, &[0xFFu8; 20]);
    std::thread::sleep(Duration::from_millis(30));

    let sample = bridge.read_slot(0).expect("sample survives");
    assert_eq!(sample.seq, 1);
    assert_eq!(sample.decoded.buttons & buttons::SOUTH, buttons::SOUTH);

    bridge.stop();
}

#[test]
fn test_virtual_handle_lifecycle() {
    let transport = Arc::new(MockTransport::new());
    let mut bridge = bridge_with(&transport);
    bridge.start().expect("start");

    // No physical pad yet: opens fall through.
    assert_eq!(
        bridge.virtual_open(5),
        Err(VirtualHandleError::NotApplicable)
    );

    transport.attach(0x045E, 0x028E, 1);
    transport.queue_report(1, &xusb_report(1 << 13)); // B button
    wait_until("decoded sample", || {
        bridge.read_slot(0).is_some_and(|s| s.seq >= 1)
    });

    bridge.note_primary_identity(1);
    assert_eq!(
        bridge.virtual_open(1),
        Err(VirtualHandleError::NotApplicable)
    );

    let handle = bridge.virtual_open(5).expect("open");
    assert_eq!(bridge.virtual_open(5), Ok(handle));

    let out = bridge.virtual_read(handle).expect("read");
    assert!(out.connected);
    assert_eq!(out.buttons & buttons::EAST, buttons::EAST);

    let info = bridge.virtual_get_info(handle).expect("info");
    assert!(info.connected);
    assert!(!info.touchpad);

    bridge.virtual_close(handle).expect("close");
    assert!(bridge.virtual_open(6).is_ok());

    bridge.stop();
}
