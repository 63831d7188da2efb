//! Firmware entry point for the piste remote control panel.
//!
//! Boot sequence: HAL + Embassy time driver, WiFi in AP+STA mode
//! (station joins the persisted piste network over DHCP, SoftAP serves
//! `RemoteControl` on its own subnet), LEDC PWM for the backlight, and
//! the settings store in internal flash. Everything after boot runs as
//! Embassy tasks.
//!
//! The display/touch stack (LVGL rendering, touchscreen sampling) lives
//! outside this crate; it feeds `backlight::note_touch_activity()` on
//! every press, pushes operator commands into `net::COMMAND_QUEUE`, and
//! reads `net::LINK_UP` to pick which screen to show.

#![no_std]
#![no_main]

mod backlight;
mod backlight_logic;
mod config;
mod error;
mod net;
mod settings;
mod storage;

use backlight::PwmBacklight;
use config::{BACKLIGHT_PWM_HZ, SOFTAP_IP, SOFTAP_PREFIX_LEN};
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Ipv4Address, Ipv4Cidr, StackResources, StaticConfigV4};
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::ledc::timer::TimerIFace;
use esp_hal::ledc::{channel, timer, LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::ledc::channel::ChannelIFace;
use esp_hal::rng::Rng;
use esp_hal::time::RateExtU32;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
use esp_wifi::EspWifiController;
use static_cell::StaticCell;
use storage::{SettingsMutex, SettingsStore};

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));
    esp_alloc::heap_allocator!(72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    info!("piste-remote booting");

    // Settings store first: both the backlight and the station identity
    // read persisted configuration during task startup.
    static SETTINGS: StaticCell<SettingsMutex> = StaticCell::new();
    let settings = SETTINGS.init(Mutex::new(SettingsStore::new()));

    // Backlight PWM: low-speed LEDC timer at 2 kHz / 8-bit duty.
    static LEDC: StaticCell<Ledc> = StaticCell::new();
    let ledc = LEDC.init(Ledc::new(peripherals.LEDC));
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    static LEDC_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();
    let lstimer = LEDC_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    lstimer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: BACKLIGHT_PWM_HZ.Hz(),
        })
        .expect("backlight timer config");

    let mut bl_channel = ledc.channel(channel::Number::Channel0, peripherals.GPIO21);
    bl_channel
        .configure(channel::config::Config {
            timer: lstimer,
            duty_pct: 0,
            pin_config: channel::config::PinConfig::PushPull,
        })
        .expect("backlight channel config");

    // WiFi in AP+STA duplex.
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let mut rng = Rng::new(peripherals.RNG);
    let net_seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    static WIFI_CTRL: StaticCell<EspWifiController<'static>> = StaticCell::new();
    let wifi_ctrl = WIFI_CTRL.init(
        esp_wifi::init(timg1.timer0, rng, peripherals.RADIO_CLK).expect("wifi controller init"),
    );
    let (ap_device, sta_device, controller) =
        esp_wifi::wifi::new_ap_sta(wifi_ctrl, peripherals.WIFI).expect("wifi interface init");

    // Station side: DHCP against the piste network.
    static STA_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (sta_stack, sta_runner) = embassy_net::new(
        sta_device,
        embassy_net::Config::dhcpv4(Default::default()),
        STA_RESOURCES.init(StackResources::new()),
        net_seed,
    );

    // SoftAP side: fixed address on a subnet disjoint from the station
    // network, so the peer target address never collides with our AP.
    static AP_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (_ap_stack, ap_runner) = embassy_net::new(
        ap_device,
        embassy_net::Config::ipv4_static(StaticConfigV4 {
            address: Ipv4Cidr::new(Ipv4Address::from(SOFTAP_IP), SOFTAP_PREFIX_LEN),
            gateway: Some(Ipv4Address::from(SOFTAP_IP)),
            dns_servers: Default::default(),
        }),
        AP_RESOURCES.init(StackResources::new()),
        net_seed ^ 0x5a5a_5a5a,
    );

    spawner.must_spawn(net::wifi::sta_net_task(sta_runner));
    spawner.must_spawn(net::wifi::ap_net_task(ap_runner));
    spawner.must_spawn(net::wifi::connection_task(controller, sta_stack, settings));
    spawner.must_spawn(net::udp::command_task(sta_stack));
    spawner.must_spawn(backlight::backlight_task(
        PwmBacklight::new(bl_channel),
        settings,
    ));

    // The GUI/touch stack drives the rest through the public hooks.
    loop {
        Timer::after_secs(60).await;
    }
}
