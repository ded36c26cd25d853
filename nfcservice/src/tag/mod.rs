// nfcservice/src/tag/mod.rs

mod dispatcher;
mod info;
mod isodep;
mod nfca;
mod session;

pub use dispatcher::TagDispatcher;
pub use info::{ExtraValue, Extras, TagInfo};
pub use isodep::IsoDepTag;
pub use nfca::NfcATag;
pub use session::{BasicTagSession, TechSession};
