//! In-memory configuration store.
//!
//! Implements [`ConfigPort`] over a single postcard blob, the same encoding
//! a flash key-value partition would hold. Values are validated on both
//! save and load so a corrupted or hand-edited blob can never reach the
//! controllers.

use std::cell::RefCell;

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ControlConfig;

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blob: RefCell<Option<Vec<u8>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing blob, e.g. one read back from flash.
    pub fn from_blob(bytes: Vec<u8>) -> Self {
        Self {
            blob: RefCell::new(Some(bytes)),
        }
    }

    /// Size of the stored blob, if any.
    pub fn stored_len(&self) -> Option<usize> {
        self.blob.borrow().as_ref().map(Vec::len)
    }
}

impl ConfigPort for MemoryConfigStore {
    fn load(&self) -> Result<ControlConfig, ConfigError> {
        let blob = self.blob.borrow();
        let Some(bytes) = blob.as_deref() else {
            info!("ConfigStore: no stored config, using defaults");
            return Ok(ControlConfig::default());
        };
        let cfg: ControlConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
        if let Err(e) = cfg.validate() {
            warn!("ConfigStore: stored config invalid: {}", e);
            return Err(e);
        }
        info!("ConfigStore: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&self, config: &ControlConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        info!("ConfigStore: config saved ({} bytes)", bytes.len());
        *self.blob.borrow_mut() = Some(bytes);
        Ok(())
    }
}
