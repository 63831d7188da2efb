//! Integration tests for piste-remote host-testable logic.
//!
//! Exercises the connectivity monitor, transport gating and backlight
//! model together the way the firmware tasks drive them: a polling
//! loop advancing wall-clock time with link events and operator input
//! injected along the way.

use core::net::Ipv4Addr;

use piste_remote::backlight_logic::{BacklightConfig, BacklightController, BacklightOutput};
use piste_remote::net::conn_logic::{ConnectivityMonitor, DEBOUNCE_WINDOW_MS};
use piste_remote::net::transport::{CommandTransport, WordPort};
use piste_remote::net::{frame, ident};
use piste_remote::settings;

struct FakeSocket {
    datagrams: Vec<Vec<u8>>,
}

impl WordPort for FakeSocket {
    fn transmit(&mut self, payload: &[u8], _ip: Ipv4Addr, _port: u16) -> usize {
        self.datagrams.push(payload.to_vec());
        payload.len()
    }
}

struct FakePwm {
    level: u8,
}

impl BacklightOutput for FakePwm {
    fn set_brightness(&mut self, level: u8) {
        self.level = level;
    }
}

#[test]
fn commands_drop_during_outage_and_flow_after_recovery() {
    let mut monitor = ConnectivityMonitor::new();
    let mut transport = CommandTransport::new("192.168.4.1", 1234);
    let mut socket = FakeSocket { datagrams: vec![] };

    // Link comes up shortly after boot; operator sends a word.
    monitor.on_address_acquired(1_000);
    assert!(transport.send(monitor.is_connected(), 0x11, &mut socket));

    // The link drops for real (past the debounce window); commands
    // issued during the outage are lost, not queued.
    assert!(monitor.on_link_dropped(1_000 + DEBOUNCE_WINDOW_MS));
    assert!(!transport.send(monitor.is_connected(), 0x22, &mut socket));
    assert!(!transport.send_batch(monitor.is_connected(), &[0x33, 0x44], &mut socket));

    // Recovery is instant on address acquisition; the next command
    // flows and the dropped ones never resurface.
    monitor.on_address_acquired(9_000);
    assert!(transport.send(monitor.is_connected(), 0x55, &mut socket));

    assert_eq!(
        socket.datagrams,
        vec![frame::encode_word(0x11).to_vec(), frame::encode_word(0x55).to_vec()]
    );
}

#[test]
fn radio_flap_does_not_interrupt_command_flow() {
    let mut monitor = ConnectivityMonitor::new();
    let mut transport = CommandTransport::new("192.168.4.1", 1234);
    let mut socket = FakeSocket { datagrams: vec![] };

    monitor.on_address_acquired(0);

    // A burst of spurious disconnects right after connecting is
    // absorbed by the debounce; every send goes through.
    for t in [500, 1_000, 1_500, 2_000, 2_500] {
        assert!(!monitor.on_link_dropped(t));
        assert!(transport.send(monitor.is_connected(), t as u32, &mut socket));
    }

    assert_eq!(socket.datagrams.len(), 5);
}

#[test]
fn persisted_backlight_settings_survive_restart() {
    let mut pwm = FakePwm { level: 0 };

    // First session: operator tunes the backlight.
    let mut controller = BacklightController::new(BacklightConfig::default(), 0, &mut pwm);
    controller.set_default_brightness(220, &mut pwm);
    controller.set_idle_brightness(15, &mut pwm);
    controller.set_backlight_timeout(30_000);
    let stored = settings::encode_backlight(&controller.config());

    // "Restart": decode what the flash would hand back and boot the
    // controller from it.
    let restored = settings::decode_backlight(&stored).expect("valid record");
    let mut pwm = FakePwm { level: 0 };
    let mut controller = BacklightController::new(restored, 0, &mut pwm);

    assert_eq!(pwm.level, 220);
    controller.tick(30_000, &mut pwm);
    assert_eq!(pwm.level, 15);
    assert!(!controller.is_active());
}

#[test]
fn operator_session_dimming_and_batch_send() {
    let mut monitor = ConnectivityMonitor::new();
    let mut transport = CommandTransport::new("192.168.4.1", 1234);
    let mut socket = FakeSocket { datagrams: vec![] };
    let mut pwm = FakePwm { level: 0 };

    let config = BacklightConfig::default();
    let mut backlight = BacklightController::new(config, 0, &mut pwm);
    monitor.on_address_acquired(0);

    // Operator touches the panel and fires a scoring batch.
    backlight.on_activity(2_000, &mut pwm);
    assert!(transport.send_batch(monitor.is_connected(), &[0x0102_0304, 0xAABB_CCDD], &mut socket));
    assert_eq!(
        socket.datagrams.last().map(Vec::as_slice),
        Some(&[0x04u8, 0x03, 0x02, 0x01, 0xDD, 0xCC, 0xBB, 0xAA][..])
    );

    // They walk away; the panel dims after the timeout but the link
    // and transport are unaffected.
    backlight.tick(2_000 + u64::from(config.timeout_ms), &mut pwm);
    assert_eq!(pwm.level, config.idle_brightness);
    assert!(monitor.is_connected());
    assert!(transport.send(monitor.is_connected(), 0x66, &mut socket));
}

#[test]
fn station_change_produces_a_joinable_identity() {
    // The identity operation persists a formatted name; whatever comes
    // back from storage must parse to the same station and be a valid
    // SSID length for the WiFi stack.
    for station in [1, 25, 999] {
        let ssid = ident::station_ssid(station);
        assert!(ssid.len() <= 32);
        assert_eq!(ident::parse_station_ssid(&ssid), Some(station));
    }
}
