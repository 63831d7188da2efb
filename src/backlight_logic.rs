//! Backlight power model - ACTIVE / IDLE driven by touch activity.
//!
//! While active the panel runs at the configured default brightness;
//! after `timeout_ms` without touch activity it drops to the idle
//! brightness. Any touch restores full brightness immediately.
//!
//! The controller is a pure function of wall-clock milliseconds and its
//! own state; the physical PWM output sits behind [`BacklightOutput`]
//! so the logic can be host-tested against a recording stub.
//!
//! Brightness values are not range-validated here - the full `u8` range
//! maps directly onto the 8-bit PWM duty, so there is nothing to clamp.

/// Brightness applied while active, until configured otherwise.
pub const DEFAULT_BRIGHTNESS: u8 = 100;

/// Brightness applied after the inactivity timeout.
pub const IDLE_BRIGHTNESS: u8 = 0;

/// Inactivity timeout before dimming (milliseconds).
pub const BACKLIGHT_TIMEOUT_MS: u32 = 10_000;

/// Physical brightness sink (PWM channel on the device, stub in tests).
pub trait BacklightOutput {
    fn set_brightness(&mut self, level: u8);
}

/// Persisted backlight configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BacklightConfig {
    /// Output level while active.
    pub default_brightness: u8,
    /// Output level after the inactivity timeout.
    pub idle_brightness: u8,
    /// Inactivity timeout in milliseconds.
    pub timeout_ms: u32,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            default_brightness: DEFAULT_BRIGHTNESS,
            idle_brightness: IDLE_BRIGHTNESS,
            timeout_ms: BACKLIGHT_TIMEOUT_MS,
        }
    }
}

/// Two-state backlight power controller.
pub struct BacklightController {
    config: BacklightConfig,
    active: bool,
    last_activity_ms: u64,
}

impl BacklightController {
    /// Start the controller: applies the default brightness and arms
    /// the activity timer. The panel must never boot with an undefined
    /// brightness, so this takes a config the caller has already
    /// defaulted if loading failed.
    pub fn new(config: BacklightConfig, now_ms: u64, out: &mut impl BacklightOutput) -> Self {
        out.set_brightness(config.default_brightness);
        Self {
            config,
            active: true,
            last_activity_ms: now_ms,
        }
    }

    /// True while in the ACTIVE state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current configuration (for persistence after setter calls).
    pub fn config(&self) -> BacklightConfig {
        self.config
    }

    /// Touch activity: re-arms the timer and, if idle, restores the
    /// default brightness. Idempotent while already active - no
    /// physical write beyond the timestamp update.
    pub fn on_activity(&mut self, now_ms: u64, out: &mut impl BacklightOutput) {
        self.last_activity_ms = now_ms;
        if !self.active {
            out.set_brightness(self.config.default_brightness);
            self.active = true;
        }
    }

    /// Periodic evaluation of the inactivity timeout. Call at sub-100ms
    /// cadence so the overshoot past the timeout stays negligible.
    pub fn tick(&mut self, now_ms: u64, out: &mut impl BacklightOutput) {
        if self.active
            && now_ms.saturating_sub(self.last_activity_ms) >= u64::from(self.config.timeout_ms)
        {
            out.set_brightness(self.config.idle_brightness);
            self.active = false;
        }
    }

    /// Update the active-mode brightness; applies immediately only if
    /// currently active. The caller persists the new config.
    pub fn set_default_brightness(&mut self, level: u8, out: &mut impl BacklightOutput) {
        self.config.default_brightness = level;
        if self.active {
            out.set_brightness(level);
        }
    }

    /// Update the idle-mode brightness; applies immediately only if
    /// currently idle. The caller persists the new config.
    pub fn set_idle_brightness(&mut self, level: u8, out: &mut impl BacklightOutput) {
        self.config.idle_brightness = level;
        if !self.active {
            out.set_brightness(level);
        }
    }

    /// Update the inactivity timeout. Takes effect at the next tick
    /// evaluation - the running timer is not re-armed.
    pub fn set_backlight_timeout(&mut self, timeout_ms: u32) {
        self.config.timeout_ms = timeout_ms;
    }
}
