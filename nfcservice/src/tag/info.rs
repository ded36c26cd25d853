// nfcservice/src/tag/info.rs

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use crate::host::TagHost;
use crate::types::{TagTechnology, TechMask};

/// A single extras value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtraValue {
    /// Text value
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Integer value
    Int(i32),
}

/// Technology-specific key/value metadata reported at discovery.
///
/// Lookups never fail: a missing key or a value of the wrong shape reads as
/// the type's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extras(BTreeMap<String, ExtraValue>);

impl Extras {
    /// Empty extras.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Extras::insert`].
    pub fn with(mut self, key: &str, value: ExtraValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: ExtraValue) {
        self.0.insert(key.to_string(), value);
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.0.get(key)
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// String view: text as-is, bytes as lowercase hex, anything else empty.
    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(ExtraValue::Text(s)) => s.clone(),
            Some(ExtraValue::Bytes(b)) => crate::utils::bytes_to_hex(b),
            _ => String::new(),
        }
    }

    /// Byte view: bytes as-is, text decoded as hex, anything else empty.
    pub fn get_bytes(&self, key: &str) -> Vec<u8> {
        match self.get(key) {
            Some(ExtraValue::Bytes(b)) => b.clone(),
            Some(ExtraValue::Text(s)) => crate::utils::parse_hex(s).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Integer view, 0 when missing or not an integer.
    pub fn get_int(&self, key: &str) -> i32 {
        match self.get(key) {
            Some(ExtraValue::Int(v)) => *v,
            _ => 0,
        }
    }
}

/// One physically present tag, valid for as long as the controller host
/// keeps the underlying handle alive.
pub struct TagInfo {
    handle: Weak<dyn TagHost>,
    uid: Vec<u8>,
    techs: TechMask,
    extras: BTreeMap<TagTechnology, Extras>,
}

impl TagInfo {
    /// Snapshot the handle's technologies and extras. Technologies without
    /// extras are still recorded, with an empty extras map.
    pub fn from_host(host: &Arc<dyn TagHost>) -> Self {
        let techs = host.tech_mask();
        let extras = techs
            .iter()
            .map(|tech| (tech, host.tech_extras(tech).unwrap_or_default()))
            .collect();
        Self {
            handle: Arc::downgrade(host),
            uid: host.uid(),
            techs,
            extras,
        }
    }

    /// Whether the controller host still owns the tag handle.
    pub fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    /// Upgrade to the live tag handle, if any.
    pub fn handle(&self) -> Option<Arc<dyn TagHost>> {
        self.handle.upgrade()
    }

    /// Tag UID, empty when the host reports none.
    pub fn uid(&self) -> &[u8] {
        &self.uid
    }

    /// Tag UID as lowercase hex.
    pub fn uid_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.uid)
    }

    /// Technologies recorded at discovery.
    pub fn technologies(&self) -> TechMask {
        self.techs
    }

    /// Whether `tech` was advertised at discovery.
    pub fn is_tech_supported(&self, tech: TagTechnology) -> bool {
        self.techs.contains(tech)
    }

    /// Extras for `tech`; `None` once the tag has left the field or when the
    /// technology is not supported.
    pub fn tech_extras(&self, tech: TagTechnology) -> Option<&Extras> {
        if !self.is_alive() {
            return None;
        }
        self.extras.get(&tech)
    }
}

impl std::fmt::Debug for TagInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagInfo")
            .field("uid", &self.uid_hex())
            .field("techs", &self.techs)
            .field("alive", &self.is_alive())
            .finish()
    }
}
