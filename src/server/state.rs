use std::sync::Arc;

use crate::chat::ChatProxy;
use crate::store::RecordStore;

/// Shared handler state. Holds no record data: every request goes back to
/// the files.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub store: RecordStore,
    pub chat: ChatProxy,
}

impl AppState {
    pub fn new(store: RecordStore, chat: ChatProxy) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, chat }),
        }
    }
}
