//! Gemini generateContent 客户端
//!
//! 请求格式：`POST {base}/v1beta/models/{model}:generateContent?key=...`
//! 请求体：`{"contents":[{"parts":[{"text": prompt}]}]}`

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TextGenerator;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::utils::truncate_text;

/// Gemini 客户端
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::api_request_failed("http client", e))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.api_base_url().to_string(),
            model_name: config.llm_model_name.clone(),
        })
    }

    /// 指定接口地址创建客户端（测试或代理场景）
    pub fn with_base_url(
        api_key: impl Into<String>,
        model_name: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            api_base_url: api_base_url.into(),
            model_name: model_name.into(),
        }
    }

    /// 不含密钥的接口地址，也用于日志和错误信息
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model_name
        )
    }
}

impl TextGenerator for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let endpoint = self.endpoint();
        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.clone(),
                source: Box::new(e.without_url()),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            warn!("Gemini API 请求频率限制，建议等待: {:?}秒", retry_after);
            return Err(ApiError::RateLimited {
                endpoint,
                retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = truncate_text(&body, 300);
            if status.is_client_error() {
                return Err(ApiError::Rejected {
                    endpoint,
                    message: format!("{}: {}", status.as_u16(), message),
                });
            }
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| ApiError::RequestFailed {
            endpoint: endpoint.clone(),
            source: Box::new(e.without_url()),
        })?;
        let payload: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::JsonParseFailed {
                source: Box::new(e),
            })?;

        let text = payload
            .first_text()
            .ok_or(ApiError::EmptyResponse { endpoint })?;

        debug!("Gemini API 调用成功，返回 {} 字符", text.len());
        Ok(text)
    }
}

// ========== 接口数据结构 ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts` 中第一段非空文本
    pub fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!("finishReason: {}", reason);
        }
        candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }
}
