//! 模拟面试流程
//!
//! 流程顺序：
//! 1. start → 开场问候 + 第一题
//! 2. submit_answer → 点评 + 下一题（按阶段推进）
//! 3. 达到题目上限后，最后一次回答只点评并结束

use tracing::{debug, info};

use crate::clients::TextGenerator;
use crate::error::{AppResult, LlmError, SessionError};
use crate::models::{CandidateProfile, InterviewStage, InterviewTranscript};
use crate::services::prompts::{closing_prompt, feedback_prompt, interview_opening_prompt};
use crate::services::retry::RetryingGenerator;
use crate::utils::truncate_text;

/// 一场模拟面试
///
/// - 不持有终端，只处理文本
/// - 当前问题、提问次数、草稿回答和面试记录都在这里
pub struct InterviewSession<G> {
    generator: RetryingGenerator<G>,
    profile: CandidateProfile,
    max_questions: usize,
    current_question: Option<String>,
    question_count: usize,
    finished: bool,
    draft: String,
    transcript: InterviewTranscript,
}

impl<G: TextGenerator> InterviewSession<G> {
    pub fn new(
        generator: RetryingGenerator<G>,
        profile: CandidateProfile,
        max_questions: usize,
    ) -> Self {
        Self {
            generator,
            profile,
            max_questions: max_questions.max(1),
            current_question: None,
            question_count: 0,
            finished: false,
            draft: String::new(),
            transcript: InterviewTranscript::default(),
        }
    }

    /// 开始面试，返回开场白和第一题
    pub async fn start(&mut self) -> AppResult<&str> {
        if self.current_question.is_some() {
            return Err(SessionError::AlreadyStarted.into());
        }

        info!("🗣️ 正在开始模拟面试...");
        let prompt = interview_opening_prompt(&self.profile);
        let text = self.ask(&prompt).await?;

        self.question_count = 1;
        self.transcript.push_question(1, text.as_str());
        Ok(self.current_question.insert(text).as_str())
    }

    /// 提交回答，返回点评和下一题（最后一题时只有点评）
    pub async fn submit_answer(&mut self, answer: &str) -> AppResult<&str> {
        if self.finished {
            return Err(SessionError::Finished {
                max: self.max_questions,
            }
            .into());
        }
        let Some(question) = self.current_question.as_deref() else {
            return Err(SessionError::NotStarted.into());
        };
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer.into());
        }

        let is_last = self.question_count >= self.max_questions;
        let prompt = if is_last {
            closing_prompt(question, answer)
        } else {
            let next_stage = InterviewStage::for_question(self.question_count + 1);
            debug!("下一题阶段: {}", next_stage);
            feedback_prompt(&self.profile, question, answer, next_stage)
        };

        let text = self.ask(&prompt).await?;
        self.transcript.record_answer(answer, text.as_str());
        self.draft.clear();

        if is_last {
            info!("✓ 面试结束，共 {} 题", self.question_count);
            self.finished = true;
        } else {
            self.question_count += 1;
            self.transcript.push_question(self.question_count, text.as_str());
            info!(
                "✓ 第 {}/{} 题 ({})",
                self.question_count,
                self.max_questions,
                InterviewStage::for_question(self.question_count)
            );
        }

        Ok(self.current_question.insert(text).as_str())
    }

    async fn ask(&self, prompt: &str) -> AppResult<String> {
        let text = self.generator.generate(prompt).await?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyContent {
                model: self.generator.model_name().to_string(),
            }
            .into());
        }
        debug!("面试官: {}", truncate_text(&text, 80));
        Ok(text)
    }

    /// 追加一段回答片段（逐段输入时累积），片段之间以空格连接
    pub fn append_transcript_fragment(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.draft.is_empty() {
            self.draft.push(' ');
        }
        self.draft.push_str(fragment);
    }

    /// 取出并清空草稿回答
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn transcript(&self) -> &InterviewTranscript {
        &self.transcript
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }
}
