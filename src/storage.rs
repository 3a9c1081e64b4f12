//! Flash backing for the persisted value image.
//!
//! Uses the nRF52840's internal flash via the `sequential-storage` crate.
//! The whole [`ImageStore`] is kept as a single map record, so every save
//! appends a fresh copy and `sequential-storage` takes care of page
//! rotation and garbage collection.
//!
//! Storage layout:
//!   - Key `KEY_VALUE_IMAGE` → raw image bytes (little-endian `i32`s in
//!     menu order, see [`persist`](crate::persist)).

use crate::config::{STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START, STORE_IMAGE_SIZE};
use crate::error::Error;
use crate::persist::ImageStore;
use defmt::{debug, error, info};
use embedded_storage_async::nor_flash::NorFlash;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// Start address of our storage region.
const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;

/// End address (exclusive) of our storage region.
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Key of the value image record.
const KEY_VALUE_IMAGE: u8 = 0x01;

/// Scratch space for one record: image plus key and item header.
const RECORD_BUFFER_SIZE: usize = STORE_IMAGE_SIZE + 16;

/// Load the image from flash.
///
/// Returns `Ok(false)` when flash holds no image yet (first run); the
/// image is then left zeroed.
pub async fn load_from_flash<const N: usize>(
    image: &mut ImageStore<N>,
    flash: &mut impl NorFlash,
) -> Result<bool, Error> {
    let mut buf = [0u8; RECORD_BUFFER_SIZE];

    match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_VALUE_IMAGE,
    )
    .await
    {
        Ok(Some(data)) => {
            image.load_bytes(data);
            info!("Loaded {} byte value image from flash", data.len());
            Ok(true)
        }
        Ok(None) => {
            info!("No value image in flash");
            image.load_bytes(&[]);
            Ok(false)
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            image.load_bytes(&[]);
            Err(Error::Storage)
        }
    }
}

/// Persist the image if it changed since the last sync.
pub async fn save_to_flash<const N: usize>(
    image: &mut ImageStore<N>,
    flash: &mut impl NorFlash,
) -> Result<(), Error> {
    if !image.is_dirty() {
        debug!("ImageStore: no changes to save");
        return Ok(());
    }

    let mut buf = [0u8; RECORD_BUFFER_SIZE];
    let item: &[u8] = image.as_bytes();

    match sequential_storage::map::store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_VALUE_IMAGE,
        &item,
    )
    .await
    {
        Ok(_) => {
            info!("Saved {} byte value image to flash", N);
            image.mark_clean();
            Ok(())
        }
        Err(e) => {
            error!("Flash write error: {:?}", defmt::Debug2Format(&e));
            Err(Error::Storage)
        }
    }
}
