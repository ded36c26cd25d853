// nfcservice/src/tag/isodep.rs

use std::sync::Arc;

use log::debug;

use crate::constants::{EXTRA_HILAYER_RESPONSE, EXTRA_HISTORICAL_BYTES};
use crate::tag::{BasicTagSession, Extras, TagInfo, TechSession};
use crate::types::TagTechnology;

/// ISO-DEP (ISO 14443-4) session.
pub struct IsoDepTag {
    tag: Arc<TagInfo>,
    historical_bytes: String,
    hi_layer_response: String,
}

impl IsoDepTag {
    /// Historical bytes from the ATS (Type A), empty if absent or the tag
    /// has left the field.
    pub fn historical_bytes(&self) -> String {
        if !self.is_tag_alive() {
            return String::new();
        }
        self.historical_bytes.clone()
    }

    /// Higher layer response from ATTRIB (Type B), empty if absent or the
    /// tag has left the field.
    pub fn hi_layer_response(&self) -> String {
        if !self.is_tag_alive() {
            return String::new();
        }
        self.hi_layer_response.clone()
    }

    /// False when no remote session can be obtained.
    pub fn is_extended_apdu_supported(&self) -> bool {
        self.remote_session()
            .is_some_and(|remote| remote.is_extended_apdu_supported())
    }
}

impl BasicTagSession for IsoDepTag {
    fn technology(&self) -> TagTechnology {
        TagTechnology::IsoDep
    }

    fn tag_info(&self) -> &Arc<TagInfo> {
        &self.tag
    }
}

impl TechSession for IsoDepTag {
    const TECH: TagTechnology = TagTechnology::IsoDep;

    fn from_parts(tag: Arc<TagInfo>, extras: &Extras) -> Self {
        if extras.is_empty() {
            debug!("IsoDep extras empty for tag {}", tag.uid_hex());
        }
        Self {
            historical_bytes: extras.get_string(EXTRA_HISTORICAL_BYTES),
            hi_layer_response: extras.get_string(EXTRA_HILAYER_RESPONSE),
            tag,
        }
    }
}
