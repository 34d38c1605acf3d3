//! 单元测试用的脚本化生成器

use std::collections::VecDeque;
use std::sync::Mutex;

use super::TextGenerator;
use crate::error::ApiError;

/// 按顺序返回预设结果，并记录收到的提示词
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, ApiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::EmptyResponse {
                    endpoint: "scripted".to_string(),
                })
            })
    }
}

/// 503 错误，可重试
pub fn unavailable() -> ApiError {
    ApiError::BadStatus {
        endpoint: "scripted".to_string(),
        status: 503,
        message: "overloaded".to_string(),
    }
}

/// 400 错误，不可重试
pub fn bad_request() -> ApiError {
    ApiError::BadStatus {
        endpoint: "scripted".to_string(),
        status: 400,
        message: "invalid argument".to_string(),
    }
}
