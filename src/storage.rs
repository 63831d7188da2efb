//! Persistent settings storage in internal flash.
//!
//! Uses the ESP32's internal flash via the `sequential-storage` map
//! API, so the backlight configuration and the station identity
//! survive power cycles. Records are keyed by the single-byte ids in
//! [`crate::settings`]; wear levelling and GC are handled by
//! `sequential-storage`.
//!
//! Access discipline: the store lives behind a single async mutex and
//! each load/store holds the lock for exactly the duration of the call.
//! The lock guard releases on every exit path, so a failed write can
//! never leave the flash handle held. Write failures are returned to
//! the caller; callers treat persistence as best-effort (log and
//! continue) because the panel must not halt on storage trouble.

use crate::backlight_logic::BacklightConfig;
use crate::config::{STORAGE_FLASH_OFFSET, STORAGE_FLASH_SECTOR_COUNT};
use crate::error::Error;
use crate::net::ident;
use crate::settings::{decode_backlight, encode_backlight, KEY_BACKLIGHT, KEY_STATION_SSID};
use core::ops::Range;
use defmt::{error, info, warn, Debug2Format};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use esp_storage::FlashStorage;
use heapless::String;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

/// Flash sector size on the ESP32 (4 KB).
const FLASH_SECTOR_SIZE: u32 = 4096;

/// End address (exclusive) of the settings region.
const STORAGE_END: u32 = STORAGE_FLASH_OFFSET + STORAGE_FLASH_SECTOR_COUNT * FLASH_SECTOR_SIZE;

/// Scratch buffer size for map items. Largest record is the station
/// SSID (32 bytes) plus map framing.
const MAX_RECORD_SIZE: usize = 64;

/// Settings store owning the flash handle for the process lifetime.
///
/// Shared between tasks as a [`SettingsMutex`].
pub struct SettingsStore {
    flash: BlockingAsync<FlashStorage>,
}

/// Mutex-guarded settings store handed to the tasks that persist.
pub type SettingsMutex = Mutex<CriticalSectionRawMutex, SettingsStore>;

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            flash: BlockingAsync::new(FlashStorage::new()),
        }
    }

    fn range() -> Range<u32> {
        STORAGE_FLASH_OFFSET..STORAGE_END
    }

    /// Load the backlight configuration, falling back to compiled
    /// defaults on absence, corruption, or read failure. Never errors:
    /// the panel must not boot with an undefined brightness.
    pub async fn load_backlight(&mut self) -> BacklightConfig {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        match fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            Self::range(),
            &mut NoCache::new(),
            &mut buf,
            &KEY_BACKLIGHT,
        )
        .await
        {
            Ok(Some(data)) => decode_backlight(data).unwrap_or_else(|| {
                warn!("storage: corrupt backlight record, using defaults");
                BacklightConfig::default()
            }),
            Ok(None) => {
                info!("storage: no stored backlight config, using defaults");
                BacklightConfig::default()
            }
            Err(e) => {
                error!("storage: flash read error: {:?}", Debug2Format(&e));
                BacklightConfig::default()
            }
        }
    }

    /// Persist the backlight configuration. Durable after return:
    /// visible to the next load even across a power cycle.
    pub async fn store_backlight(&mut self, config: &BacklightConfig) -> Result<(), Error> {
        let record = encode_backlight(config);
        self.store_raw(KEY_BACKLIGHT, &record).await
    }

    /// Load the persisted station SSID, defaulting to the SSID of
    /// [`ident::DEFAULT_STATION`] on first boot or read failure.
    pub async fn load_station_ssid(&mut self) -> String<32> {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        let stored = match fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            Self::range(),
            &mut NoCache::new(),
            &mut buf,
            &KEY_STATION_SSID,
        )
        .await
        {
            Ok(Some(data)) => core::str::from_utf8(data)
                .ok()
                .and_then(|s| String::try_from(s).ok()),
            Ok(None) => None,
            Err(e) => {
                error!("storage: flash read error: {:?}", Debug2Format(&e));
                None
            }
        };
        stored.unwrap_or_else(|| ident::station_ssid(ident::DEFAULT_STATION))
    }

    /// Persist the station identity as its formatted network name.
    pub async fn store_station(&mut self, station: u32) -> Result<(), Error> {
        let ssid = ident::station_ssid(station);
        self.store_raw(KEY_STATION_SSID, ssid.as_bytes()).await
    }

    async fn store_raw(&mut self, key: u8, value: &[u8]) -> Result<(), Error> {
        let mut buf = [0u8; MAX_RECORD_SIZE];
        match store_item::<u8, &[u8], _>(
            &mut self.flash,
            Self::range(),
            &mut NoCache::new(),
            &mut buf,
            &key,
            &value,
        )
        .await
        {
            Ok(()) => Ok(()),
            Err(sequential_storage::Error::FullStorage) => {
                error!("storage: settings region full");
                Err(Error::StorageFull)
            }
            Err(e) => {
                error!("storage: flash write error: {:?}", Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
