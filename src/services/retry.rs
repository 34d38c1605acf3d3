//! 有界指数退避重试
//!
//! 网络错误、5xx 和频率限制会重试；频率限制优先按服务端给出的 Retry-After 等待

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::TextGenerator;
use crate::config::Config;
use crate::error::{ApiError, LlmError};

/// 重试策略
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 最多调用次数（含第一次）
    pub max_attempts: u32,
    pub initial_delay: Duration,
    /// 单次等待上限
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            initial_delay: Duration::from_millis(config.initial_backoff_ms),
            max_delay: Duration::from_millis(config.max_backoff_ms),
            ..Self::default()
        }
    }

    /// 第 `attempt` 次失败后的退避时间：initial * multiplier^(attempt-1)，不超过 max_delay
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// 结合错误类型计算实际等待时间
    fn wait_for(&self, attempt: u32, error: &ApiError) -> Duration {
        let backoff = self.delay_for(attempt);
        match error.retry_after() {
            Some(secs) => Duration::from_secs(secs).max(backoff).min(self.max_delay),
            None => backoff,
        }
    }
}

/// 带重试地执行一个异步调用
///
/// # 参数
/// - `policy`: 重试策略
/// - `label`: 日志中的调用名称
/// - `op`: 每次尝试都会重新调用的闭包
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("✓ {} 第 {} 次尝试成功", label, attempt);
                }
                return Ok(value);
            }
            Err(error) if !error.is_retryable() => {
                warn!("{} 调用失败且不可重试: {}", label, error);
                return Err(LlmError::ApiCallFailed {
                    label: label.to_string(),
                    source: error,
                });
            }
            Err(error) if attempt >= max_attempts => {
                warn!("❌ {} 已重试 {} 次，放弃: {}", label, attempt, error);
                return Err(LlmError::RetriesExhausted {
                    label: label.to_string(),
                    attempts: attempt,
                    last: error,
                });
            }
            Err(error) => {
                let wait = policy.wait_for(attempt, &error);
                warn!(
                    "{} 调用失败 (尝试 {}/{}): {}，{}ms 后重试...",
                    label,
                    attempt,
                    max_attempts,
                    error,
                    wait.as_millis()
                );
                sleep(wait).await;
            }
        }
    }
}

/// 给任意生成器套上重试策略
pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// 生成文本，失败时按策略重试
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        with_retry(&self.policy, self.inner.model_name(), || {
            self.inner.generate(prompt)
        })
        .await
    }
}
