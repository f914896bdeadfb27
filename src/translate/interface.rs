use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input handed to the pipeline: a single text or an ordered batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineInput {
    Single(String),
    Batch(Vec<String>),
}

impl PipelineInput {
    /// Number of records the pipeline is expected to return
    pub fn expected_records(&self) -> usize {
        match self {
            PipelineInput::Single(_) => 1,
            PipelineInput::Batch(texts) => texts.len(),
        }
    }
}

/// One result record produced by the translation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub translation_text: String,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("pipeline service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("pipeline output does not match the translation record contract: {0}")]
    Shape(String),
}

/// Translation capability - the model itself is hosted by the pipeline service
#[async_trait]
pub trait TranslationPipeline: Send + Sync {
    /// Run the pipeline once over the whole input.
    ///
    /// # Returns
    /// One record per input text, in input order
    async fn run(&self, input: PipelineInput) -> Result<Vec<TranslationRecord>, PipelineError>;
}
