use std::sync::Arc;

use crate::services::assistant::GameAssistant;
use crate::services::providers::Catalog;

/// Shared application state: the two external collaborators behind their
/// narrow interfaces.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub assistant: Arc<dyn GameAssistant>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, assistant: Arc<dyn GameAssistant>) -> Self {
        Self { catalog, assistant }
    }
}
