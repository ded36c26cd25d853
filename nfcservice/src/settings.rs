// nfcservice/src/settings.rs

use std::sync::{Mutex, PoisonError};

use crate::Result;

/// Persists the last requested on/off intent across boots.
pub trait SettingsStore: Send + Sync {
    /// Persist the last requested on/off intent.
    fn save_enabled_flag(&self, enabled: bool) -> Result<()>;

    /// `None` when nothing was ever saved.
    fn load_enabled_flag(&self) -> Option<bool>;
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    enabled: Mutex<Option<bool>>,
}

impl MemorySettings {
    /// Store with nothing saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports `enabled` as previously saved.
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled: Mutex::new(Some(enabled)),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn save_enabled_flag(&self, enabled: bool) -> Result<()> {
        *self.enabled.lock().unwrap_or_else(PoisonError::into_inner) = Some(enabled);
        Ok(())
    }

    fn load_enabled_flag(&self) -> Option<bool> {
        *self.enabled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
