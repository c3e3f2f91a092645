//! Inference Adapters - 视觉语言模型适配器

mod fake_client;
mod openai_client;

pub use fake_client::FakeInferenceClient;
pub use openai_client::{OpenAiVisionClient, OpenAiVisionConfig};
