use std::fmt;

use serde::{Deserialize, Serialize};

/// 面试阶段，按提问顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    Introduction,
    SkillsAndTools,
    Projects,
    Experience,
    Behavioral,
}

impl InterviewStage {
    /// 第 n 题（从 1 开始）所处的阶段，第 5 题之后一直停留在 Behavioral
    pub fn for_question(number: usize) -> Self {
        match number {
            0 | 1 => InterviewStage::Introduction,
            2 => InterviewStage::SkillsAndTools,
            3 => InterviewStage::Projects,
            4 => InterviewStage::Experience,
            _ => InterviewStage::Behavioral,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InterviewStage::Introduction => "Introduction",
            InterviewStage::SkillsAndTools => "Skills & Tools",
            InterviewStage::Projects => "Projects",
            InterviewStage::Experience => "Internships/Experience",
            InterviewStage::Behavioral => "HR/Behavioral",
        }
    }
}

impl fmt::Display for InterviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// 一轮问答
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewTurn {
    pub number: usize,
    pub stage: InterviewStage,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// 面试记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewTranscript {
    pub turns: Vec<InterviewTurn>,
}

impl InterviewTranscript {
    pub fn push_question(&mut self, number: usize, question: impl Into<String>) {
        self.turns.push(InterviewTurn {
            number,
            stage: InterviewStage::for_question(number),
            question: question.into(),
            answer: None,
            feedback: None,
        });
    }

    /// 给最近一题补上回答和反馈
    pub fn record_answer(&mut self, answer: impl Into<String>, feedback: impl Into<String>) {
        if let Some(turn) = self.turns.last_mut() {
            turn.answer = Some(answer.into());
            turn.feedback = Some(feedback.into());
        }
    }

    pub fn answered_count(&self) -> usize {
        self.turns.iter().filter(|t| t.answer.is_some()).count()
    }

    pub fn last(&self) -> Option<&InterviewTurn> {
        self.turns.last()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
