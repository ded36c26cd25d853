// nfcservice/src/prelude.rs

pub use crate::host::{NfccHost, NfccHostListener, TagHost};
pub use crate::listener::{ListenerHandle, ListenerRegistry, NfcStateCallback};
pub use crate::service::{Initialized, NfcService, NfcServiceBuilder, PendingTask, Uninitialized};
pub use crate::tag::{BasicTagSession, IsoDepTag, NfcATag, TagDispatcher, TagInfo, TechSession};
pub use crate::{
    CallerToken, ControllerState, Error, ErrorCode, NfcTask, Result, ScreenState, TagTechnology,
    TechMask,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, ms, parse_hex};
