//! WiFi connection task - station/AP duplex with debounced link state.
//!
//! The station side joins the configured piste network (DHCP); the
//! SoftAP side serves the companion `RemoteControl` network on its own
//! subnet. The task owns the [`ConnectivityMonitor`] and is the only
//! writer of [`LINK_UP`].
//!
//! Event handling:
//!   - `StaDisconnected` events from the driver feed the monitor's
//!     debounced drop path as they arrive.
//!   - A periodic poll observes DHCP address acquisition (the connect
//!     direction, honored immediately) and drives the rate-limited
//!     reconnect. The reconnect is always issued on an eligible poll;
//!     skipping it silently would never recover a dropped link.
//!   - `NetCommand::SetStation` persists the new identity and forces a
//!     disconnect/reconnect cycle against the new SSID.

use core::sync::atomic::Ordering;

use crate::config::{LINK_POLL_MS, SOFTAP_PASSWORD, SOFTAP_SSID, WIFI_PASSWORD};
use crate::error::Error;
use crate::net::conn_logic::ConnectivityMonitor;
use crate::net::{ident, NetCommand, LINK_UP, NET_COMMANDS};
use crate::storage::SettingsMutex;
use defmt::{debug, info, warn, Debug2Format};
use embassy_futures::select::{select3, Either3};
use embassy_net::{Runner, Stack};
use embassy_time::{Instant, Timer};
use esp_wifi::config::PowerSaveMode;
use esp_wifi::wifi::{
    AccessPointConfiguration, AuthMethod, ClientConfiguration, Configuration, WifiApDevice,
    WifiController, WifiDevice, WifiEvent, WifiStaDevice,
};
use heapless::String;

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Build the AP+STA configuration for the given station SSID.
fn duplex_configuration(ssid: &String<32>) -> Configuration {
    let client = ClientConfiguration {
        ssid: ssid.clone(),
        password: String::try_from(WIFI_PASSWORD).unwrap_or_default(),
        ..Default::default()
    };
    let ap = AccessPointConfiguration {
        ssid: String::try_from(SOFTAP_SSID).unwrap_or_default(),
        password: String::try_from(SOFTAP_PASSWORD).unwrap_or_default(),
        auth_method: AuthMethod::WPA2Personal,
        ..Default::default()
    };
    Configuration::Mixed(client, ap)
}

/// Point the station side at a (possibly new) SSID.
fn apply_station(controller: &mut WifiController<'static>, ssid: &String<32>) -> Result<(), Error> {
    controller
        .set_configuration(&duplex_configuration(ssid))
        .map_err(|e| {
            warn!("wifi: set_configuration failed: {:?}", Debug2Format(&e));
            Error::Wifi
        })
}

/// Runs the embassy-net stack for the station interface.
#[embassy_executor::task]
pub async fn sta_net_task(mut runner: Runner<'static, WifiDevice<'static, WifiStaDevice>>) -> ! {
    runner.run().await
}

/// Runs the embassy-net stack for the SoftAP interface.
#[embassy_executor::task]
pub async fn ap_net_task(mut runner: Runner<'static, WifiDevice<'static, WifiApDevice>>) -> ! {
    runner.run().await
}

/// Owns the WiFi controller and the connectivity state machine.
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    sta_stack: Stack<'static>,
    settings: &'static SettingsMutex,
) -> ! {
    let ssid = settings.lock().await.load_station_ssid().await;
    info!("wifi: joining station network {}", ssid.as_str());

    if apply_station(&mut controller, &ssid).is_ok() {
        if let Err(e) = controller.start_async().await {
            warn!("wifi: start failed: {:?}", Debug2Format(&e));
        }
        // Modem sleeps between beacons unless we are transmitting.
        if let Err(e) = controller.set_power_saving(PowerSaveMode::Minimum) {
            warn!("wifi: power save config failed: {:?}", Debug2Format(&e));
        }
        if let Err(e) = controller.connect_async().await {
            warn!("wifi: initial connect failed: {:?}", Debug2Format(&e));
        }
    }

    let mut monitor = ConnectivityMonitor::new();

    loop {
        let event = select3(
            controller.wait_for_event(WifiEvent::StaDisconnected),
            NET_COMMANDS.receive(),
            Timer::after_millis(LINK_POLL_MS),
        )
        .await;

        match event {
            Either3::First(()) => {
                let now = now_ms();
                if monitor.on_link_dropped(now) {
                    warn!("wifi: [{}] disconnect accepted, link down", now);
                } else {
                    debug!("wifi: [{}] disconnect ignored (debounce active)", now);
                }
            }
            Either3::Second(NetCommand::SetStation(station)) => {
                let new_ssid = ident::station_ssid(station);
                info!("wifi: switching to station network {}", new_ssid.as_str());
                if let Err(e) = settings.lock().await.store_station(station).await {
                    warn!("wifi: failed to persist station: {:?}", e);
                }
                let _ = controller.disconnect_async().await;
                if apply_station(&mut controller, &new_ssid).is_ok() {
                    if let Err(e) = controller.connect_async().await {
                        warn!("wifi: connect failed: {:?}", Debug2Format(&e));
                    }
                }
            }
            Either3::Third(()) => {
                let now = now_ms();
                if sta_stack.is_config_up() && monitor.on_address_acquired(now) {
                    if let Some(cfg) = sta_stack.config_v4() {
                        info!("wifi: [{}] got IP address {}", now, cfg.address);
                    }
                }

                let check = monitor.check_connection(now);
                if check.reconnect_due {
                    // Raw link status is only an auxiliary check for the log;
                    // the reconnect is issued either way.
                    if !matches!(controller.is_connected(), Ok(true)) {
                        info!("wifi: [{}] connection lost, attempting reconnect", now);
                    }
                    if let Err(e) = controller.connect_async().await {
                        debug!("wifi: reconnect attempt failed: {:?}", Debug2Format(&e));
                    }
                }
            }
        }

        LINK_UP.store(monitor.is_connected(), Ordering::Relaxed);
    }
}
