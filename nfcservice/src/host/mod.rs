// nfcservice/src/host/mod.rs

/// In-memory controller and tag hosts for tests.
pub mod mock;
/// Host-side contracts.
pub mod traits;

pub use mock::{HostCall, MockNfccHost, MockTagHost};
pub use traits::{NfccHost, NfccHostListener, TagHost};
