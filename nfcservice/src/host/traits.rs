// nfcservice/src/host/traits.rs

use std::sync::{Arc, Weak};

use crate::Result;
use crate::tag::Extras;
use crate::types::{ScreenState, TagTechnology, TechMask};

/// Capability the controller host calls back into when a tag enters the
/// field. The host only ever holds a `Weak` handle to it.
pub trait NfccHostListener: Send + Sync {
    /// A tag entered the field. The host keeps `tag` alive while it
    /// stays there.
    fn on_tag_discovered(&self, tag: Arc<dyn TagHost>);
}

/// Controller-host contract. Abstracts the controller driver away from the
/// service state machine; the service owns its host exclusively.
pub trait NfccHost: Send {
    /// Wire the discovery callback. Failing here means no hardware session
    /// could be established.
    fn attach_listener(&mut self, listener: Weak<dyn NfccHostListener>) -> Result<()>;

    /// Bring the controller up (firmware download, core init, discovery
    /// start). Blocking; may take tens of seconds.
    fn initialize(&mut self) -> bool;

    /// Quiesce and power down the controller. Blocking.
    fn deinitialize(&mut self) -> bool;

    /// Reconfigure discovery for the given screen state.
    fn set_screen_state(&mut self, state: ScreenState);
}

/// Per-tag handle owned by the controller host for as long as the tag is in
/// the field.
pub trait TagHost: Send + Sync {
    /// Supported technologies reported at discovery.
    fn tech_mask(&self) -> TechMask;

    /// Technology-specific extras, `None` when the host has none.
    fn tech_extras(&self, tech: TagTechnology) -> Option<Extras>;

    /// Tag UID as reported by the controller.
    fn uid(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Whether the RF field still sees the tag.
    fn is_field_on(&self) -> bool {
        true
    }

    /// Select the given technology for subsequent exchanges.
    fn connect(&self, tech: TagTechnology) -> Result<()>;

    /// Exchange raw bytes with the tag.
    fn transceive(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Whether the tag and controller negotiated extended-length APDUs.
    fn is_extended_apdu_supported(&self) -> bool {
        false
    }
}
