//! Test-only library interface for piste-remote.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no ESP32 hardware required): the connectivity state
//! machine, the backlight power model, command framing and transport
//! gating, the settings record codec and the station identity format.
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! behind the `embedded` feature. This lib.rs provides a separate entry
//! point for host-based testing.

#![cfg_attr(not(test), no_std)]

pub mod backlight_logic;
pub mod settings;

pub mod net {
    pub mod conn_logic;
    pub mod frame;
    pub mod ident;
    pub mod transport;
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
