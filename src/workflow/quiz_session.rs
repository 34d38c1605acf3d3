//! 测验作答流程

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{AppResult, SessionError};
use crate::models::{OptionLabel, Quiz, QuizQuestion, QuizScore};
use crate::services::report_writer::SessionReport;

/// 答错的题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub id: u32,
    pub question: String,
    pub chosen: OptionLabel,
    pub correct: OptionLabel,
    pub correct_text: String,
}

/// 一次测验作答
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: BTreeMap<u32, OptionLabel>,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: BTreeMap::new(),
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.quiz.questions
    }

    /// 作答，返回是否正确；重复作答以最后一次为准
    pub fn answer(&mut self, id: u32, label: OptionLabel) -> AppResult<bool> {
        let question = self
            .quiz
            .get(id)
            .ok_or(SessionError::UnknownQuestion { id })?;
        let correct = question.is_correct(label);
        debug!("第 {} 题选择 {}，{}", id, label, if correct { "正确" } else { "错误" });
        self.answers.insert(id, label);
        Ok(correct)
    }

    pub fn answer_for(&self, id: u32) -> Option<OptionLabel> {
        self.answers.get(&id).copied()
    }

    pub fn score(&self) -> QuizScore {
        let correct = self
            .quiz
            .questions
            .iter()
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_answer))
            .count();
        QuizScore {
            correct,
            answered: self.answers.len(),
            total: self.quiz.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.quiz
            .questions
            .iter()
            .all(|q| self.answers.contains_key(&q.id))
    }

    /// 列出答错的题目，未作答的不计入
    pub fn review(&self) -> Vec<QuestionReview> {
        self.quiz
            .questions
            .iter()
            .filter_map(|q| {
                let chosen = *self.answers.get(&q.id)?;
                (chosen != q.correct_answer).then(|| QuestionReview {
                    id: q.id,
                    question: q.question.clone(),
                    chosen,
                    correct: q.correct_answer,
                    correct_text: q.correct_option().to_string(),
                })
            })
            .collect()
    }

    pub fn to_report(&self, model: &str) -> SessionReport {
        SessionReport::quiz(
            model,
            self.score(),
            self.quiz.questions.clone(),
            self.answers.clone(),
        )
    }
}
