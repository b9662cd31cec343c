//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements both [`StoragePort`] and [`ConfigPort`] on top of one small
//! byte image. The image is loaded once at construction and written back as
//! a single NVS blob after every mutation.
//!
//! ```text
//! addr  0..14   alarm slots (see `alarm::store`)
//! addr 14..16   unused
//! addr 16       config magic
//! addr 17       config length
//! addr 18..64   postcard-encoded ControllerConfig
//! ```
//!
//! On the host the image lives only in memory, which is enough for tests.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StoragePort};
use crate::config::ControllerConfig;
use crate::error::StorageError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Size of the byte image.
pub const IMAGE_LEN: usize = 64;
pub const CONFIG_ADDR: u16 = 16;
pub const CONFIG_MAGIC: u8 = 0xC0;
const CONFIG_HEADER: usize = 2;
const CONFIG_MAX: usize = IMAGE_LEN - CONFIG_ADDR as usize - CONFIG_HEADER;

#[cfg(target_os = "espidf")]
const NAMESPACE: &[u8] = b"coopdoor\0";
#[cfg(target_os = "espidf")]
const IMAGE_KEY: &[u8] = b"image\0";

pub struct NvsByteStore {
    image: [u8; IMAGE_LEN],
}

impl NvsByteStore {
    /// Initialise NVS flash and load the stored image.
    ///
    /// A missing image (first boot) starts as all zeros. On first boot or
    /// after a version mismatch the NVS partition is erased and
    /// re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }

            let mut image = [0u8; IMAGE_LEN];
            match Self::read_blob(&mut image) {
                Ok(()) => info!("NvsByteStore: image loaded"),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => info!("NvsByteStore: no image, starting blank"),
                Err(e) => {
                    warn!("NvsByteStore: read error {}, starting blank", e);
                    image = [0u8; IMAGE_LEN];
                }
            }
            Ok(Self { image })
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("NvsByteStore: simulation backend");
            Ok(Self::with_image([0u8; IMAGE_LEN]))
        }
    }

    /// Start from a given image (host tests, fuzzing).
    #[cfg(not(target_os = "espidf"))]
    pub fn with_image(image: [u8; IMAGE_LEN]) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &[u8; IMAGE_LEN] {
        &self.image
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        #[cfg(target_os = "espidf")]
        {
            Self::write_blob(&self.image).map_err(|e| {
                warn!("NvsByteStore: write error {}", e);
                StorageError::Io
            })
        }

        #[cfg(not(target_os = "espidf"))]
        Ok(())
    }

    /// Open the namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(image: &mut [u8; IMAGE_LEN]) -> Result<(), i32> {
        Self::with_nvs_handle(false, |handle| {
            let mut size = IMAGE_LEN;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    IMAGE_KEY.as_ptr() as *const _,
                    image.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(image: &[u8; IMAGE_LEN]) -> Result<(), i32> {
        Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    IMAGE_KEY.as_ptr() as *const _,
                    image.as_ptr() as *const _,
                    IMAGE_LEN,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        })
    }
}

impl StoragePort for NvsByteStore {
    fn read_byte(&mut self, addr: u16) -> Result<u8, StorageError> {
        self.image
            .get(addr as usize)
            .copied()
            .ok_or(StorageError::OutOfRange(addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), StorageError> {
        let slot = self
            .image
            .get_mut(addr as usize)
            .ok_or(StorageError::OutOfRange(addr))?;
        *slot = value;
        self.persist()
    }

    fn capacity(&self) -> u16 {
        IMAGE_LEN as u16
    }

    /// One flash commit per call instead of one per byte.
    fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= IMAGE_LEN)
            .ok_or(StorageError::OutOfRange(addr))?;
        self.image[start..end].copy_from_slice(data);
        self.persist()
    }
}

fn validate_config(cfg: &ControllerConfig) -> Result<(), ConfigError> {
    cfg.validate().map_err(ConfigError::ValidationFailed)
}

impl ConfigPort for NvsByteStore {
    fn load(&mut self) -> Result<ControllerConfig, ConfigError> {
        let base = CONFIG_ADDR as usize;
        if self.image[base] != CONFIG_MAGIC {
            info!("NvsByteStore: no stored config");
            return Err(ConfigError::NotFound);
        }
        let len = self.image[base + 1] as usize;
        if len == 0 || len > CONFIG_MAX {
            return Err(ConfigError::Corrupted);
        }
        let payload = &self.image[base + CONFIG_HEADER..base + CONFIG_HEADER + len];
        let cfg: ControllerConfig = postcard::from_bytes(payload).map_err(|_| ConfigError::Corrupted)?;
        validate_config(&cfg)?;
        info!("NvsByteStore: loaded config ({} bytes)", len);
        Ok(cfg)
    }

    fn save(&mut self, config: &ControllerConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        let mut buf = [0u8; CONFIG_MAX];
        let len = postcard::to_slice(config, &mut buf)
            .map_err(|_| ConfigError::StorageFull)?
            .len();

        let mut record = [0u8; CONFIG_HEADER + CONFIG_MAX];
        record[0] = CONFIG_MAGIC;
        record[1] = len as u8;
        record[CONFIG_HEADER..CONFIG_HEADER + len].copy_from_slice(&buf[..len]);
        self.write_bytes(CONFIG_ADDR, &record[..CONFIG_HEADER + len])?;
        info!("NvsByteStore: config saved ({} bytes)", len);
        Ok(())
    }
}
