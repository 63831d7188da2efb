//! Backlight task - LEDC PWM output plus the activity/settings loop.
//!
//! The panel backlight gate hangs off a low-speed LEDC channel (2 kHz,
//! 8-bit duty, so brightness levels map 1:1 onto duty). The task
//! multiplexes three inputs:
//!
//!   - the touch-activity signal raised by the display driver on every
//!     press event,
//!   - settings commands from the UI (brightness levels, timeout),
//!     which are applied and persisted,
//!   - a 50 ms tick that evaluates the inactivity timeout.

use crate::backlight_logic::{BacklightController, BacklightOutput};
use crate::config::BACKLIGHT_TICK_MS;
use crate::storage::SettingsMutex;
use defmt::{info, warn};
use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Instant, Timer};
use esp_hal::ledc::channel::{Channel as LedcChannel, ChannelHW};
use esp_hal::ledc::LowSpeed;

/// Raised by the touch collaborator on every press-type event. All
/// other touch event kinds are ignored at the source.
static TOUCH_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Settings changes coming from the UI layer.
#[derive(Clone, Copy, Debug)]
pub enum BacklightCommand {
    SetDefaultBrightness(u8),
    SetIdleBrightness(u8),
    SetTimeout(u32),
}

/// Queue of backlight settings changes.
pub static BACKLIGHT_COMMANDS: Channel<CriticalSectionRawMutex, BacklightCommand, 4> =
    Channel::new();

/// Touch collaborator hook: call on each press event.
pub fn note_touch_activity() {
    TOUCH_ACTIVITY.signal(());
}

/// [`BacklightOutput`] over the LEDC PWM channel driving the gate pin.
pub struct PwmBacklight {
    channel: LedcChannel<'static, LowSpeed>,
}

impl PwmBacklight {
    pub fn new(channel: LedcChannel<'static, LowSpeed>) -> Self {
        Self { channel }
    }
}

impl BacklightOutput for PwmBacklight {
    fn set_brightness(&mut self, level: u8) {
        // 8-bit duty resolution: the level is the raw duty.
        self.channel.set_duty_hw(u32::from(level));
    }
}

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Runs the backlight power model against the PWM output.
#[embassy_executor::task]
pub async fn backlight_task(mut out: PwmBacklight, settings: &'static SettingsMutex) -> ! {
    let config = settings.lock().await.load_backlight().await;
    info!(
        "backlight: default={} idle={} timeout={}ms",
        config.default_brightness, config.idle_brightness, config.timeout_ms
    );

    let mut controller = BacklightController::new(config, now_ms(), &mut out);

    loop {
        match select3(
            TOUCH_ACTIVITY.wait(),
            BACKLIGHT_COMMANDS.receive(),
            Timer::after_millis(BACKLIGHT_TICK_MS),
        )
        .await
        {
            Either3::First(()) => {
                controller.on_activity(now_ms(), &mut out);
            }
            Either3::Second(command) => {
                match command {
                    BacklightCommand::SetDefaultBrightness(level) => {
                        controller.set_default_brightness(level, &mut out);
                    }
                    BacklightCommand::SetIdleBrightness(level) => {
                        controller.set_idle_brightness(level, &mut out);
                    }
                    BacklightCommand::SetTimeout(timeout_ms) => {
                        controller.set_backlight_timeout(timeout_ms);
                    }
                }
                // Best-effort persistence; the new values are already live.
                if let Err(e) = settings.lock().await.store_backlight(&controller.config()).await {
                    warn!("backlight: failed to persist config: {:?}", e);
                }
            }
            Either3::Third(()) => {
                let was_active = controller.is_active();
                controller.tick(now_ms(), &mut out);
                if was_active && !controller.is_active() {
                    info!("backlight: dimmed after inactivity");
                }
            }
        }
    }
}
