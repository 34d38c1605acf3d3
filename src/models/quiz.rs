use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 选择题选项标号 a-d
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLabel {
    #[default]
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    /// 不区分大小写解析单个字母
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(OptionLabel::A),
            'b' => Some(OptionLabel::B),
            'c' => Some(OptionLabel::C),
            'd' => Some(OptionLabel::D),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLabel {
    type Err = String;

    /// 接受 `a`、`B`、`c)`、`(d)` 之类的输入
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches([')', '.', ':']);
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| format!("无效选项: {}", s)),
            _ => Err(format!("无效选项: {}", s)),
        }
    }
}

/// 单道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// 从 1 开始的顺序编号
    pub id: u32,
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: OptionLabel,
}

impl QuizQuestion {
    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.index()]
    }

    pub fn correct_option(&self) -> &str {
        self.option(self.correct_answer)
    }

    pub fn is_correct(&self, label: OptionLabel) -> bool {
        self.correct_answer == label
    }
}

/// 一套测验：解析后的题目和模型原始输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub raw_text: String,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// 测验得分
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl QuizScore {
    /// 正确率（按总题数计算）
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.total as f64
        }
    }
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.0}%)",
            self.correct,
            self.total,
            self.percentage()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_label_parsing() {
        assert_eq!("a".parse::<OptionLabel>(), Ok(OptionLabel::A));
        assert_eq!(" B ".parse::<OptionLabel>(), Ok(OptionLabel::B));
        assert_eq!("c)".parse::<OptionLabel>(), Ok(OptionLabel::C));
        assert_eq!("(d)".parse::<OptionLabel>(), Ok(OptionLabel::D));
        assert!("e".parse::<OptionLabel>().is_err());
        assert!("ab".parse::<OptionLabel>().is_err());
        assert!("".parse::<OptionLabel>().is_err());
    }

    #[test]
    fn test_option_label_index_round_trip() {
        for (i, label) in OptionLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(OptionLabel::from_index(i), Some(*label));
        }
        assert_eq!(OptionLabel::from_index(4), None);
        assert_eq!(OptionLabel::D.to_string(), "d");
    }

    #[test]
    fn test_question_serializes_camel_case() {
        let question = QuizQuestion {
            id: 1,
            question: "What does CRUD stand for?".to_string(),
            options: [
                "Create Read Update Delete".to_string(),
                "Copy Run Undo Debug".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_answer: OptionLabel::A,
        };
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["correctAnswer"], "a");
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
        assert_eq!(question.correct_option(), "Create Read Update Delete");
    }

    #[test]
    fn test_score_display() {
        let score = QuizScore {
            correct: 3,
            answered: 4,
            total: 4,
        };
        assert_eq!(score.to_string(), "3/4 (75%)");
        assert_eq!(QuizScore::default().percentage(), 0.0);
    }
}
