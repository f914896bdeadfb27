use std::sync::Arc;

use crate::translate::TranslationPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<dyn TranslationPipeline>,
}

impl AppState {
    /// The pipeline is loaded by the caller and shared read-only from here on
    pub fn new(pipeline: Arc<dyn TranslationPipeline>) -> Self {
        Self { pipeline }
    }
}
