// nfcservice/src/tag/dispatcher.rs

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::host::TagHost;
use crate::tag::{TagInfo, TechSession};

/// Turns raw discovery events into [`TagInfo`] and hands out typed sessions.
#[derive(Default)]
pub struct TagDispatcher {
    current: Mutex<Option<Arc<TagInfo>>>,
    subscribers: Mutex<Vec<Sender<Arc<TagInfo>>>>,
}

impl TagDispatcher {
    /// Dispatcher with no current tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a discovered tag. Queries the handle once; never fails, a
    /// tag without technologies yields an empty-capability `TagInfo`.
    /// The result supersedes any previously discovered tag.
    pub fn dispatch(&self, host: &Arc<dyn TagHost>) -> Arc<TagInfo> {
        let tag = Arc::new(TagInfo::from_host(host));
        if tag.technologies().is_empty() {
            debug!("tag {} reports no technologies", tag.uid_hex());
        }
        info!(
            "tag discovered uid={} techs={:?}",
            tag.uid_hex(),
            tag.technologies().iter().collect::<Vec<_>>()
        );

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(tag.clone());
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(tag.clone()).is_ok());
        tag
    }

    /// Most recently discovered tag, while it is still in the field.
    pub fn current_tag(&self) -> Option<Arc<TagInfo>> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|tag| !tag.is_alive()) {
            *current = None;
        }
        current.clone()
    }

    /// Forget the current tag (controller going down).
    pub fn clear(&self) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Typed session for `T::TECH`, `None` when unavailable.
    pub fn session<T: TechSession>(&self, tag: &Arc<TagInfo>) -> Option<T> {
        T::get(tag)
    }

    /// Receive every future discovery.
    pub fn subscribe(&self) -> Receiver<Arc<TagInfo>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }
}
