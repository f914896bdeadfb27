pub mod interface;
pub mod client;
pub mod factory;

pub use interface::{PipelineError, PipelineInput, TranslationPipeline};
pub use factory::PipelineFactory;
