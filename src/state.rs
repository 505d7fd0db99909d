use crate::config::Config;
use crate::store::KittenStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KittenStore>,
    pub config: Arc<Config>,
}
