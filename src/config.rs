use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// Gemini 原生接口地址
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// OpenAI 兼容接口地址
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// LLM 提供方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Gemini generateContent 接口
    #[default]
    Gemini,
    /// OpenAI 兼容的 chat completion 接口
    OpenAi,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "open_ai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnknownProvider {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// 程序配置
///
/// 优先级：环境变量 > TOML 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    /// 为空时按提供方使用默认地址
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 重试配置 ---
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    // --- 会话配置 ---
    /// 每次生成的测验题数量
    pub quiz_question_count: usize,
    /// 一场面试最多提问数
    pub max_interview_questions: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 会话日志文件
    pub output_log_file: String,
    /// 会话报告输出目录
    pub report_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::Gemini,
            llm_api_key: String::new(),
            llm_api_base_url: None,
            llm_model_name: "gemini-1.5-flash".to_string(),
            request_timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            quiz_question_count: 15,
            max_interview_questions: 10,
            verbose_logging: false,
            output_log_file: "interview_log.txt".to_string(),
            report_dir: "reports".to_string(),
        }
    }
}

impl Config {
    /// 仅从环境变量加载
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// 从可选的 TOML 文件加载，再叠加环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// 解析 TOML 文件
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(display.clone(), e))?;
        toml::from_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: display,
                source,
            })
        })
    }

    /// 用外部键值覆盖配置，解析失败的值保留原值
    pub fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            llm_provider: parse_var(&lookup, "LLM_PROVIDER").unwrap_or(self.llm_provider),
            llm_api_key: lookup("LLM_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .unwrap_or(self.llm_api_key),
            llm_api_base_url: lookup("LLM_API_BASE_URL").or(self.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")
                .unwrap_or(self.request_timeout_secs),
            max_retries: parse_var(&lookup, "MAX_RETRIES").unwrap_or(self.max_retries),
            initial_backoff_ms: parse_var(&lookup, "INITIAL_BACKOFF_MS").unwrap_or(self.initial_backoff_ms),
            max_backoff_ms: parse_var(&lookup, "MAX_BACKOFF_MS").unwrap_or(self.max_backoff_ms),
            quiz_question_count: parse_var(&lookup, "QUIZ_QUESTION_COUNT")
                .unwrap_or(self.quiz_question_count),
            max_interview_questions: parse_var(&lookup, "MAX_INTERVIEW_QUESTIONS")
                .unwrap_or(self.max_interview_questions),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            report_dir: lookup("REPORT_DIR").unwrap_or(self.report_dir),
        }
    }

    /// 实际使用的 API 地址
    pub fn api_base_url(&self) -> &str {
        match (&self.llm_api_base_url, self.llm_provider) {
            (Some(url), _) if !url.trim().is_empty() => url.as_str(),
            (_, LlmProvider::Gemini) => GEMINI_API_BASE_URL,
            (_, LlmProvider::OpenAi) => OPENAI_API_BASE_URL,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 检查启动所需的配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_retries".to_string(),
                value: self.max_retries.to_string(),
                reason: "至少需要 1 次尝试".to_string(),
            });
        }
        if self.quiz_question_count == 0 {
            return Err(ConfigError::InvalidValue {
                name: "quiz_question_count".to_string(),
                value: self.quiz_question_count.to_string(),
                reason: "题目数量必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}
