//! OpenAI 兼容接口客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如通过代理暴露的 Gemini）

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::TextGenerator;
use crate::config::Config;
use crate::error::ApiError;

const ENDPOINT: &str = "chat/completions";

/// `status code 503` / `status: 502` / `HTTP 500`，不匹配消息里的普通数字
static SERVER_ERROR_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:status(?:\s+code)?|http)\s*[:=]?\s*50[0234]\b").expect("status regex")
});

static RATE_LIMIT_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:status(?:\s+code)?|http)\s*[:=]?\s*429\b|too many requests")
        .expect("rate limit regex")
});

/// 面试官角色的系统消息
const SYSTEM_MESSAGE: &str =
    "You are a friendly and professional technical interviewer and quiz author.";

/// OpenAI 兼容客户端
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    system_message: Option<String>,
}

impl OpenAiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(config.api_base_url());

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            system_message: Some(SYSTEM_MESSAGE.to_string()),
        }
    }

    /// 替换系统消息，传 `None` 则不发送
    pub fn with_system_message(mut self, system_message: Option<String>) -> Self {
        self.system_message = system_message;
        self
    }

    fn build_request(
        &self,
        prompt: &str,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest, OpenAIError> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = &self.system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg.as_str())
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(2048u32)
            .build()
    }
}

impl TextGenerator for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        debug!("调用 OpenAI 兼容接口，模型: {}", self.model_name);

        let request = self.build_request(prompt).map_err(classify_error)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            classify_error(e)
        })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::EmptyResponse {
                endpoint: ENDPOINT.to_string(),
            })
    }
}

/// 根据错误信息判断是否可重试
fn classify_error(error: OpenAIError) -> ApiError {
    let message = error.to_string();
    let lower = message.to_lowercase();

    if RATE_LIMIT_STATUS.is_match(&lower) || lower.contains("rate limit") || lower.contains("quota") {
        ApiError::RateLimited {
            endpoint: ENDPOINT.to_string(),
            retry_after: None,
        }
    } else if is_transient(&lower) {
        ApiError::RequestFailed {
            endpoint: ENDPOINT.to_string(),
            source: Box::new(error),
        }
    } else {
        ApiError::Rejected {
            endpoint: ENDPOINT.to_string(),
            message,
        }
    }
}

fn is_transient(lower: &str) -> bool {
    SERVER_ERROR_STATUS.is_match(lower)
        || [
            "timeout",
            "timed out",
            "connection",
            "network",
            "overloaded",
            "internal server error",
            "bad gateway",
            "service unavailable",
            "gateway timeout",
        ]
        .iter()
        .any(|needle| lower.contains(needle))
}
