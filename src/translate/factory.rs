use std::sync::Arc;
use anyhow::Result;
use tracing::info;

use crate::config::PipelineConfig;
use super::client::HttpPipeline;
use super::interface::TranslationPipeline;

/// Factory for the process-wide translation pipeline
pub struct PipelineFactory;

impl PipelineFactory {
    /// Load the translation pipeline described by the configuration.
    ///
    /// # Arguments
    /// * `config` - pipeline section of the service configuration
    ///
    /// # Returns
    /// Shared TranslationPipeline implementation, to be injected into AppState
    pub async fn create(config: &PipelineConfig) -> Result<Arc<dyn TranslationPipeline>> {
        info!(
            "Initializing translation pipeline: task={}, model={}",
            config.task, config.model_path
        );

        let pipeline = HttpPipeline::load(
            config.service_url.clone(),
            config.model_path.clone(),
            config.task.clone(),
        )
        .await?;

        Ok(Arc::new(pipeline))
    }
}
