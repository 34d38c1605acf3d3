//! 测验生成服务
//!
//! 提示词 → 带重试的模型调用 → 容错解析

use tracing::{info, warn};

use crate::clients::TextGenerator;
use crate::error::{AppResult, LlmError};
use crate::models::{CandidateProfile, Quiz};
use crate::services::prompts::quiz_prompt;
use crate::services::quiz_parser::parse_quiz;
use crate::services::retry::RetryingGenerator;
use crate::utils::truncate_text;

/// 测验生成服务
pub struct QuizService<G> {
    generator: RetryingGenerator<G>,
}

impl<G: TextGenerator> QuizService<G> {
    pub fn new(generator: RetryingGenerator<G>) -> Self {
        Self { generator }
    }

    /// 根据候选人资料生成 `count` 道选择题
    ///
    /// 解析出的题目少于 `count` 时只告警；一道都没有时返回错误
    pub async fn generate(&self, profile: &CandidateProfile, count: usize) -> AppResult<Quiz> {
        info!("🧠 正在根据技能与项目生成 {} 道选择题...", count);

        let prompt = quiz_prompt(profile, count);
        let raw_text = self.generator.generate(&prompt).await?;

        let questions = parse_quiz(&raw_text);
        if questions.is_empty() {
            warn!(
                "无法从模型输出中解析出题目: {}",
                truncate_text(&raw_text, 120)
            );
            return Err(LlmError::NoQuestionsParsed { requested: count }.into());
        }
        if questions.len() < count {
            warn!("⚠️ 请求 {} 道题，只解析出 {} 道", count, questions.len());
        } else {
            info!("✓ 已生成 {} 道选择题", questions.len());
        }

        Ok(Quiz {
            questions,
            raw_text,
        })
    }
}
