use std::sync::Arc;

use bizcard_core::Directory;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub directory: Arc<dyn Directory>,
    pub jwt_secret: String,
}

impl AppStateInner {
    pub fn new(directory: Arc<dyn Directory>, jwt_secret: impl Into<String>) -> AppState {
        Arc::new(Self {
            directory,
            jwt_secret: jwt_secret.into(),
        })
    }
}
