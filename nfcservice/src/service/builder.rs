// nfcservice/src/service/builder.rs

use std::sync::Arc;

use crate::auth::{AllowAll, Authorizer};
use crate::host::NfccHost;
use crate::service::config::ServiceConfig;
use crate::service::handle::{NfcService, Uninitialized};
use crate::settings::{MemorySettings, SettingsStore};
use crate::{Error, Result};

/// Helper to construct an NfcService with optional collaborators.
#[derive(Default)]
pub struct NfcServiceBuilder {
    host: Option<Box<dyn NfccHost>>,
    settings: Option<Arc<dyn SettingsStore>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    config: ServiceConfig,
}

impl NfcServiceBuilder {
    /// Builder with default collaborators and config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the controller host (e.g. MockNfccHost). Required.
    pub fn with_host(mut self, host: Box<dyn NfccHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Settings store for the enabled flag. Defaults to [`MemorySettings`].
    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Listener authorization. Defaults to [`AllowAll`].
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Budgets and boot behaviour.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and return an uninitialized service.
    /// Requires a host; otherwise returns HostMissing.
    pub fn build(self) -> Result<NfcService<Uninitialized>> {
        let host = self.host.ok_or(Error::HostMissing)?;
        Ok(NfcService::from_parts(
            host,
            self.settings
                .unwrap_or_else(|| Arc::new(MemorySettings::new()) as Arc<dyn SettingsStore>),
            self.authorizer
                .unwrap_or_else(|| Arc::new(AllowAll) as Arc<dyn Authorizer>),
            self.config,
        ))
    }
}
