use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use super::interface::{PipelineError, PipelineInput, TranslationPipeline, TranslationRecord};

/// Translation pipeline hosted by the local model service
#[derive(Debug, Clone)]
pub struct HttpPipeline {
    client: Client,
    service_url: String,
    model_path: String,
    task: String,
}

#[derive(Debug, Serialize)]
struct LoadRequest<'a> {
    task: &'a str,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    task: &'a str,
    model: &'a str,
    inputs: &'a PipelineInput,
}

impl HttpPipeline {
    pub fn new(service_url: String, model_path: String, task: String) -> Self {
        Self {
            client: Client::new(),
            service_url: service_url.trim_end_matches('/').to_string(),
            model_path,
            task,
        }
    }

    /// Create the pipeline and have the model service load the model.
    ///
    /// Called once at startup; the returned pipeline is shared for the
    /// process lifetime. Fails when the service is down or cannot load
    /// `model_path` for `task`.
    pub async fn load(
        service_url: String,
        model_path: String,
        task: String,
    ) -> anyhow::Result<Self> {
        let pipeline = Self::new(service_url, model_path, task);

        match pipeline.health_check().await {
            Ok(true) => {}
            Ok(false) => anyhow::bail!(
                "Pipeline service at {} is not healthy, cannot load model {}",
                pipeline.service_url,
                pipeline.model_path
            ),
            Err(e) => anyhow::bail!(
                "Pipeline service at {} is unreachable, cannot load model {}: {}",
                pipeline.service_url,
                pipeline.model_path,
                e
            ),
        }

        if let Err(e) = pipeline.load_model().await {
            anyhow::bail!(
                "Pipeline service at {} failed to load model {} for task {}: {}",
                pipeline.service_url,
                pipeline.model_path,
                pipeline.task,
                e
            );
        }

        info!(
            "Loaded translation pipeline: task={}, model={}, service={}",
            pipeline.task, pipeline.model_path, pipeline.service_url
        );
        Ok(pipeline)
    }

    async fn load_model(&self) -> Result<(), PipelineError> {
        let url = format!("{}/load", self.service_url);
        let request = LoadRequest {
            task: &self.task,
            model: &self.model_path,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool, PipelineError> {
        let url = format!("{}/health", self.service_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl TranslationPipeline for HttpPipeline {
    async fn run(&self, input: PipelineInput) -> Result<Vec<TranslationRecord>, PipelineError> {
        let url = format!("{}/pipeline", self.service_url);
        let request = PipelineRequest {
            task: &self.task,
            model: &self.model_path,
            inputs: &input,
        };

        debug!("Sending pipeline request: {} input(s)", input.expected_records());

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Pipeline service failed with {}: {}", status, body);
            return Err(PipelineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<Vec<TranslationRecord>>(&body)
            .map_err(|e| PipelineError::Shape(e.to_string()))
    }
}
