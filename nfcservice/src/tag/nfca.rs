// nfcservice/src/tag/nfca.rs

use std::sync::Arc;

use crate::constants::{EXTRA_ATQA, EXTRA_SAK};
use crate::tag::{BasicTagSession, Extras, TagInfo, TechSession};
use crate::types::TagTechnology;

/// NFC-A (ISO 14443-3A) session.
pub struct NfcATag {
    tag: Arc<TagInfo>,
    sak: i32,
    atqa: Vec<u8>,
}

impl NfcATag {
    /// SAK byte, 0 when absent or the tag is gone.
    pub fn sak(&self) -> i32 {
        if !self.is_tag_alive() {
            return 0;
        }
        self.sak
    }

    /// ATQA as lowercase hex.
    pub fn atqa(&self) -> String {
        if !self.is_tag_alive() {
            return String::new();
        }
        crate::utils::bytes_to_hex(&self.atqa)
    }
}

impl BasicTagSession for NfcATag {
    fn technology(&self) -> TagTechnology {
        TagTechnology::NfcA
    }

    fn tag_info(&self) -> &Arc<TagInfo> {
        &self.tag
    }
}

impl TechSession for NfcATag {
    const TECH: TagTechnology = TagTechnology::NfcA;

    fn from_parts(tag: Arc<TagInfo>, extras: &Extras) -> Self {
        Self {
            sak: extras.get_int(EXTRA_SAK),
            atqa: extras.get_bytes(EXTRA_ATQA),
            tag,
        }
    }
}
