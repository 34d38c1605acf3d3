use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 面试 / 测验会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// API 返回非 2xx 状态码
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message}")]
    BadStatus {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 请求频率限制
    #[error("API请求频率限制 ({endpoint}), 建议等待: {retry_after:?}秒")]
    RateLimited {
        endpoint: String,
        retry_after: Option<u64>,
    },
    /// 服务端拒绝请求（鉴权失败、参数错误等）
    #[error("API拒绝请求 ({endpoint}): {message}")]
    Rejected { endpoint: String, message: String },
    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    /// 是否值得重试
    ///
    /// 网络错误、429 以及 500/502/503/504 可重试，其余直接失败
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RequestFailed { .. } | ApiError::RateLimited { .. } => true,
            ApiError::BadStatus { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            ApiError::Rejected { .. }
            | ApiError::EmptyResponse { .. }
            | ApiError::JsonParseFailed { .. } => false,
        }
    }

    /// 服务端建议的等待秒数（仅限频率限制）
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败（不可重试的错误）
    #[error("LLM API调用失败 ({label}): {source}")]
    ApiCallFailed {
        label: String,
        #[source]
        source: ApiError,
    },
    /// 重试次数耗尽
    #[error("LLM调用重试 {attempts} 次后仍然失败 ({label}): {last}")]
    RetriesExhausted {
        label: String,
        attempts: u32,
        #[source]
        last: ApiError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 无法从返回文本中解析出任何题目
    #[error("无法从LLM返回内容中解析出题目 (请求 {requested} 道)")]
    NoQuestionsParsed { requested: usize },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 终端输入输出失败
    #[error("终端读写失败: {0}")]
    Io(#[source] std::io::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥，请设置 LLM_API_KEY 或 GEMINI_API_KEY")]
    MissingApiKey,
    /// 未知的 LLM 提供方
    #[error("未知的 LLM 提供方: {value} (可选: gemini, openai)")]
    UnknownProvider { value: String },
    /// 配置值非法
    #[error("配置项 {name} 的值 '{value}' 非法: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// 面试 / 测验会话错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 简历与岗位描述都为空
    #[error("简历和岗位描述不能同时为空")]
    EmptyProfile,
    /// 面试尚未开始
    #[error("面试尚未开始")]
    NotStarted,
    /// 面试已经开始
    #[error("面试已经开始")]
    AlreadyStarted,
    /// 回答为空
    #[error("回答不能为空")]
    EmptyAnswer,
    /// 已达到题目上限
    #[error("面试已结束 (共 {max} 题)")]
    Finished { max: usize },
    /// 题目编号不存在
    #[error("题目 {id} 不存在")]
    UnknownQuestion { id: u32 },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::Io(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return AppError::File(FileError::NotFound { path });
        }
        AppError::File(FileError::ReadFailed { path, source })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
