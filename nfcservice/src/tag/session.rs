// nfcservice/src/tag/session.rs

use std::sync::Arc;

use log::debug;

use crate::host::TagHost;
use crate::tag::{Extras, TagInfo};
use crate::types::TagTechnology;
use crate::{Error, Result};

/// Capabilities shared by every technology session.
pub trait BasicTagSession {
    /// Technology this session speaks.
    fn technology(&self) -> TagTechnology;

    /// Tag the session was created for.
    fn tag_info(&self) -> &Arc<TagInfo>;

    /// Liveness check; every read re-validates through this.
    fn is_tag_alive(&self) -> bool {
        self.tag_info().is_alive()
    }

    /// The live tag handle for protocol calls, `None` once the tag is gone.
    fn remote_session(&self) -> Option<Arc<dyn TagHost>> {
        self.tag_info().handle()
    }

    /// Select this technology on the tag. `Error::TagLost` once gone.
    fn connect(&self) -> Result<()> {
        let remote = self.remote_session().ok_or(Error::TagLost)?;
        remote.connect(self.technology())
    }

    /// Exchange raw bytes. `Error::TagLost` once the tag is gone or the
    /// field is off.
    fn transceive(&self, data: &[u8]) -> Result<Vec<u8>> {
        let remote = self.remote_session().ok_or(Error::TagLost)?;
        if !remote.is_field_on() {
            return Err(Error::TagLost);
        }
        remote.transceive(data)
    }
}

/// A session bound to one technology, constructible from a live tag.
pub trait TechSession: BasicTagSession + Sized {
    /// Technology required on the tag.
    const TECH: TagTechnology;

    /// Build the session from the tag and the extras recorded for `TECH`.
    fn from_parts(tag: Arc<TagInfo>, extras: &Extras) -> Self;

    /// `None` unless the tag is still present and advertises `TECH`.
    fn get(tag: &Arc<TagInfo>) -> Option<Self> {
        if !tag.is_alive() || !tag.is_tech_supported(Self::TECH) {
            debug!("{} session unavailable for tag {}", Self::TECH, tag.uid_hex());
            return None;
        }
        let extras = tag.tech_extras(Self::TECH).cloned().unwrap_or_default();
        Some(Self::from_parts(tag.clone(), &extras))
    }
}
