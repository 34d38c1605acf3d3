//! 文本生成客户端
//!
//! 所有对外部大模型接口的调用都经过 [`TextGenerator`]

pub mod gemini_client;
pub mod openai_client;

#[cfg(test)]
pub(crate) mod testing;

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

use crate::config::{Config, LlmProvider};
use crate::error::{ApiError, AppResult};

/// 文本生成能力：输入提示词，返回模型文本
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// 模型名称（用于日志）
    fn model_name(&self) -> &str;

    /// 单次调用，不做重试
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// 按配置选择的后端
pub enum LlmClient {
    Gemini(GeminiClient),
    OpenAi(OpenAiClient),
}

impl LlmClient {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(match config.llm_provider {
            LlmProvider::Gemini => LlmClient::Gemini(GeminiClient::new(config)?),
            LlmProvider::OpenAi => LlmClient::OpenAi(OpenAiClient::new(config)),
        })
    }
}

impl TextGenerator for LlmClient {
    fn model_name(&self) -> &str {
        match self {
            LlmClient::Gemini(client) => client.model_name(),
            LlmClient::OpenAi(client) => client.model_name(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        match self {
            LlmClient::Gemini(client) => client.generate(prompt).await,
            LlmClient::OpenAi(client) => client.generate(prompt).await,
        }
    }
}
