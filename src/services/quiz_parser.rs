//! 选择题文本解析
//!
//! 把模型返回的半结构化文本解析成 [`QuizQuestion`] 列表。解析永不失败：
//! - 缺失的选项补为 `Option A` .. `Option D`
//! - 缺失或无法识别的答案默认为 a
//! - 空题干补为 `Question {id}`
//! - 编号按出现顺序从 1 重新分配

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{OptionLabel, QuizQuestion};

/// `1.` / `1)` / `Q1:` / `Question 1:` / `### 1.`
///
/// 带 `Q` / `Question` 前缀时标点可省略（`Question 1`，题干在下一行）
static QUESTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:#{1,6}\s*)?(?:q(?:uestion)?\s*\d{1,3}\s*[.):\-]?|\d{1,3}\s*[.):\-])(?:\s+(?P<text>.*))?$",
    )
    .expect("question header regex")
});

/// `a)` / `(b)` / `C.` / `- d:` / `a]`
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[-*•]\s*)?\(?([a-d])\s*[).:\]]\s*(.*)$").expect("option line regex")
});

/// 同一行内的多个选项：`a) X b) Y c) Z d) W`
static INLINE_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\(?([a-dA-D])\)\s*").expect("inline option regex"));

/// `Correct Answer: a)` / `Answer: B` / `✅ Correct option - c`
static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[^\p{L}\p{N}]*(?:correct\s+(?:answer|option)|answer|ans)(?:\s*[:\-]|\s+is\b:?)\s*(.*)$",
    )
    .expect("answer line regex")
});

/// 选项行末尾夹带的答案
static EMBEDDED_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcorrect\s+answer(?:\s+is)?\s*[:\-]?\s*(.*)$").expect("embedded answer regex")
});

/// 答案中的标号：`a)` / `(b)` / `Option C`
static ANSWER_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:option\s+)?\(?([a-d])(?:[).:\]]|$)").expect("answer label regex")
});

/// 字母后直接跟文字（`B PUT` / `A document database`），只作为候选
static ANSWER_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:option\s+)?\(?([a-d])\s").expect("answer hint regex")
});

/// 包住整段的单星号 / 单下划线强调：`*text*` / `_text_`
static STAR_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w*])\*([^*\s](?:[^*]*[^*\s])?)\*($|[^\w*])").expect("star emphasis regex")
});
static UNDERSCORE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w_])_([^_\s](?:[^_]*[^_\s])?)_($|[^\w_])")
        .expect("underscore emphasis regex")
});

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•]\s*").expect("bullet regex"));

/// 解析模型返回的测验文本
pub fn parse_quiz(text: &str) -> Vec<QuizQuestion> {
    let mut drafts = Vec::new();
    let mut current: Option<Draft> = None;

    for raw in text.lines() {
        let line = clean_line(raw);
        if !line.chars().any(char::is_alphanumeric) {
            continue;
        }

        if let Some(caps) = ANSWER_LINE.captures(&line) {
            if let Some(draft) = current.as_mut() {
                draft.set_answer(caps.get(1).map_or("", |m| m.as_str()));
            }
            continue;
        }

        if let Some(caps) = QUESTION_HEADER.captures(&line) {
            if let Some(draft) = current.take() {
                drafts.push(draft);
            }
            current = Some(Draft::with_question(caps.name("text").map_or("", |m| m.as_str())));
            continue;
        }

        // 第一个题号之前的内容（开场白等）忽略
        let Some(draft) = current.as_mut() else {
            continue;
        };

        if let Some(options) = split_options(&line) {
            for (label, option_text) in options {
                draft.set_option(label, &option_text);
            }
        } else {
            draft.append_text(&line);
        }
    }

    if let Some(draft) = current {
        drafts.push(draft);
    }

    let questions: Vec<QuizQuestion> = drafts
        .into_iter()
        .filter(|d| !d.is_blank())
        .enumerate()
        .map(|(i, d)| d.finish(i as u32 + 1))
        .collect();

    debug!("解析出 {} 道选择题", questions.len());
    questions
}

/// 去掉 markdown 强调符号，保留 `__init__` 这类标识符
fn clean_line(raw: &str) -> String {
    let mut line = raw.replace("**", "");
    for emphasis in [&*STAR_EMPHASIS, &*UNDERSCORE_EMPHASIS] {
        // 相邻的两段强调共用分隔符，一次替换只能处理其中一段
        while emphasis.is_match(&line) {
            let replaced = emphasis.replace_all(&line, "${1}${2}${3}").into_owned();
            if replaced == line {
                break;
            }
            line = replaced;
        }
    }
    line.trim().to_string()
}

/// 识别选项行，支持一行多个选项
fn split_options(line: &str) -> Option<Vec<(OptionLabel, String)>> {
    let body = BULLET.replace(line, "");

    let markers: Vec<(usize, usize, OptionLabel)> = INLINE_OPTION
        .captures_iter(&body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?.as_str().chars().next().and_then(OptionLabel::from_char)?;
            Some((whole.start(), whole.end(), label))
        })
        .collect();

    let ordered = markers.windows(2).all(|w| w[0].2 < w[1].2);
    if markers.len() >= 2 && markers[0].0 == 0 && ordered {
        let options = markers
            .iter()
            .enumerate()
            .map(|(i, &(_, end, label))| {
                let stop = markers.get(i + 1).map_or(body.len(), |next| next.0);
                (label, body[end..stop].trim().to_string())
            })
            .collect();
        return Some(options);
    }

    let caps = OPTION_LINE.captures(line)?;
    let label = caps.get(1)?.as_str().chars().next().and_then(OptionLabel::from_char)?;
    let option_text = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    Some(vec![(label, option_text)])
}

fn capture_label(regex: &Regex, text: &str) -> Option<OptionLabel> {
    let caps = regex.captures(text.trim())?;
    caps.get(1)?.as_str().chars().next().and_then(OptionLabel::from_char)
}

fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', ')', '*'])
        .trim()
        .to_lowercase()
}

fn push_text(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text.trim());
}

/// 解析中的一道题
#[derive(Debug, Default)]
struct Draft {
    question: String,
    options: [Option<String>; 4],
    last_option: Option<usize>,
    answer: Option<OptionLabel>,
    answer_text: Option<String>,
    /// 文本匹配不上选项时才采用
    answer_hint: Option<OptionLabel>,
}

impl Draft {
    fn with_question(text: &str) -> Self {
        Self {
            question: text.trim().to_string(),
            ..Self::default()
        }
    }

    /// 已经读到答案，后续的散文本不再归入本题
    fn is_closed(&self) -> bool {
        self.answer.is_some() || self.answer_text.is_some()
    }

    fn append_text(&mut self, text: &str) {
        if self.is_closed() {
            return;
        }
        let text = self.split_embedded_answer(text);
        if text.is_empty() {
            return;
        }
        match self.last_option {
            Some(index) => push_text(self.options[index].get_or_insert_with(String::new), &text),
            None => push_text(&mut self.question, &text),
        }
    }

    fn set_option(&mut self, label: OptionLabel, text: &str) {
        let text = self.split_embedded_answer(text);
        let slot = &mut self.options[label.index()];
        if slot.is_none() {
            *slot = Some(text);
        }
        self.last_option = Some(label.index());
    }

    fn set_answer(&mut self, remainder: &str) {
        if self.answer.is_some() {
            return;
        }
        if let Some(label) = capture_label(&ANSWER_LABEL, remainder) {
            self.answer = Some(label);
            return;
        }
        let remainder = remainder.trim();
        if !remainder.is_empty() {
            self.answer_hint = capture_label(&ANSWER_HINT, remainder);
            self.answer_text = Some(remainder.to_string());
        }
    }

    /// 把 `... Correct Answer: b)` 从文本末尾剥离
    fn split_embedded_answer(&mut self, text: &str) -> String {
        match EMBEDDED_ANSWER.captures(text) {
            Some(caps) => {
                let start = caps.get(0).map_or(text.len(), |m| m.start());
                self.set_answer(caps.get(1).map_or("", |m| m.as_str()));
                text[..start].trim().to_string()
            }
            None => text.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        self.question.trim().is_empty() && self.options.iter().all(Option::is_none)
    }

    /// 答案只给了文本时，按选项内容匹配，匹配不上再用字母候选
    fn resolve_answer(&self) -> Option<OptionLabel> {
        self.answer
            .or_else(|| self.match_answer_text())
            .or(self.answer_hint)
    }

    fn match_answer_text(&self) -> Option<OptionLabel> {
        let wanted = normalize(self.answer_text.as_deref()?);
        if wanted.is_empty() {
            return None;
        }
        let options: Vec<(usize, String)> = self
            .options
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_deref().map(|o| (i, normalize(o))))
            .filter(|(_, o)| !o.is_empty())
            .collect();

        options
            .iter()
            .find(|(_, o)| *o == wanted)
            .or_else(|| {
                options
                    .iter()
                    .find(|(_, o)| o.contains(wanted.as_str()) || wanted.contains(o.as_str()))
            })
            .and_then(|(i, _)| OptionLabel::from_index(*i))
    }

    fn finish(self, id: u32) -> QuizQuestion {
        let correct_answer = self.resolve_answer().unwrap_or_else(|| {
            debug!("第 {} 题未识别到答案，默认选 a", id);
            OptionLabel::default()
        });

        let question = if self.question.trim().is_empty() {
            format!("Question {}", id)
        } else {
            self.question.trim().to_string()
        };

        let options = std::array::from_fn(|i| {
            self.options[i]
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Option {}", OptionLabel::ALL[i].as_char().to_ascii_uppercase())
                })
        });

        QuizQuestion {
            id,
            question,
            options,
            correct_answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"Here are 2 MCQs based on the technical profile:

**1. Which hook is used to manage state in a React function component?**
a) useEffect
b) useState
c) useRef
d) useMemo
**Correct Answer: b)**

**2. Which SQL statement removes rows from a table?**
a) DROP
b) REMOVE
c) DELETE
d) TRUNCATE COLUMN
**Correct Answer: c)**

Good luck with your practice!
"#;

    #[test]
    fn test_parse_canonical_format() {
        let questions = parse_quiz(SAMPLE);
        assert_eq!(questions.len(), 2);

        let first = &questions[0];
        assert_eq!(first.id, 1);
        assert_eq!(
            first.question,
            "Which hook is used to manage state in a React function component?"
        );
        assert_eq!(first.options[1], "useState");
        assert_eq!(first.correct_answer, OptionLabel::B);

        let second = &questions[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.correct_option(), "DELETE");
        // 结尾的客套话不应并入最后一个选项
        assert_eq!(second.options[3], "TRUNCATE COLUMN");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let text = "1. What does REST stand for?\na) Representational State Transfer\nb) Remote Execution\n";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        assert_eq!(q.options[0], "Representational State Transfer");
        assert_eq!(q.options[2], "Option C");
        assert_eq!(q.options[3], "Option D");
        assert_eq!(q.correct_answer, OptionLabel::A);
    }

    #[test]
    fn test_blank_question_text_gets_placeholder() {
        let text = "1.\na) yes\nb) no\nCorrect Answer: b\n";
        let questions = parse_quiz(text);
        assert_eq!(questions[0].question, "Question 1");
        assert_eq!(questions[0].correct_answer, OptionLabel::B);
    }

    #[test]
    fn test_answer_given_as_option_text() {
        let text = "1. Which Python framework ships with an ORM and admin panel?\n\
                    a) Flask\nb) FastAPI\nc) Django\nd) Bottle\n\
                    Correct Answer: Django\n";
        let questions = parse_quiz(text);
        assert_eq!(questions[0].correct_answer, OptionLabel::C);
    }

    #[test]
    fn test_question_prefix_styles_and_uppercase_options() {
        let text = "Question 1: Which HTTP method is idempotent?\n\
                    (A) POST\n(B) PUT\n(C) PATCH\n(D) CONNECT\n\
                    Answer: B\n\n\
                    Q2) What is MongoDB?\n\
                    - A. A relational database\n- B. A document database\n- C. A message queue\n- D. A cache\n\
                    ✅ Correct option - b\n";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options[1], "PUT");
        assert_eq!(questions[0].correct_answer, OptionLabel::B);
        assert_eq!(questions[1].question, "What is MongoDB?");
        assert_eq!(questions[1].options[1], "A document database");
        assert_eq!(questions[1].correct_answer, OptionLabel::B);
    }

    #[test]
    fn test_inline_options() {
        let text = "1. Which keyword declares a constant in JavaScript?\n\
                    a) var b) let c) const d) static\n\
                    Correct Answer: c)\n";
        let questions = parse_quiz(text);
        let q = &questions[0];
        assert_eq!(q.options, ["var", "let", "const", "static"].map(String::from));
        assert_eq!(q.correct_answer, OptionLabel::C);
    }

    #[test]
    fn test_multiline_question_and_option_continuation() {
        let text = "1. Consider the following code:\n\
                    print(len([1, 2, 3]))\n\
                    a) 3\nb) 2\nc) An error is raised\n   because lists have no length\nd) None\n\
                    Correct Answer: a)\n";
        let questions = parse_quiz(text);
        let q = &questions[0];
        assert_eq!(q.question, "Consider the following code: print(len([1, 2, 3]))");
        assert_eq!(q.options[2], "An error is raised because lists have no length");
        assert_eq!(q.options[3], "None");
    }

    #[test]
    fn test_ids_are_sequential_even_when_numbering_skips() {
        let text = "1. First?\na) x\n3. Second?\na) y\n7. Third?\na) z\n";
        let ids: Vec<u32> = parse_quiz(text).iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_answer_embedded_in_last_option() {
        let text = "1. Which port does HTTPS use by default?\n\
                    a) 80\nb) 443\nc) 21\nd) 22 **Correct Answer: b)**\n";
        let q = &parse_quiz(text)[0];
        assert_eq!(q.options[3], "22");
        assert_eq!(q.correct_answer, OptionLabel::B);
    }

    #[test]
    fn test_markdown_identifiers_survive_cleaning() {
        let text = "1. What does `__init__` do in a Python class?\na) Initializes a new instance\nCorrect Answer: a\n";
        let q = &parse_quiz(text)[0];
        assert_eq!(q.question, "What does `__init__` do in a Python class?");
    }

    #[test]
    fn test_single_star_emphasis_on_header_and_options() {
        let text = "*1. Which hook manages state?*\n\
                    a) useEffect\nb) *useState*\nc) _useRef_\nd) useMemo\n\
                    Correct Answer: b)\n";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.question, "Which hook manages state?");
        assert_eq!(q.options, ["useEffect", "useState", "useRef", "useMemo"].map(String::from));
        assert_eq!(q.correct_answer, OptionLabel::B);
    }

    #[test]
    fn test_emphasis_cleaning_keeps_identifiers_and_arithmetic() {
        assert_eq!(clean_line("*a* and *b*"), "a and b");
        assert_eq!(clean_line("snake_case_name and __init__"), "snake_case_name and __init__");
        assert_eq!(clean_line("2 * 3 * 4 = 24"), "2 * 3 * 4 = 24");
        assert_eq!(clean_line("* a) bullet"), "* a) bullet");
    }

    #[test]
    fn test_bare_question_headers_with_text_on_next_line() {
        let text = "**Question 1**\n\
                    Which HTTP status means Not Found?\n\
                    a) 200\nb) 301\nc) 404\nd) 500\n\
                    **Correct Answer: c)**\n\n\
                    ### Question 2\n\
                    Which command creates a new Cargo project?\n\
                    a) cargo new\nb) cargo build\nc) cargo run\nd) cargo test\n\
                    **Correct Answer: a)**\n";
        let questions = parse_quiz(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Which HTTP status means Not Found?");
        assert_eq!(questions[0].correct_option(), "404");
        assert_eq!(questions[1].question, "Which command creates a new Cargo project?");
        assert_eq!(questions[1].correct_answer, OptionLabel::A);
    }

    #[test]
    fn test_answer_text_starting_with_article_a() {
        let text = "1. What is MongoDB?\n\
                    a) A relational database\nb) A document database\nc) A message queue\nd) A cache\n\
                    Correct Answer: A document database\n";
        assert_eq!(parse_quiz(text)[0].correct_answer, OptionLabel::B);
    }

    #[test]
    fn test_letter_followed_by_explanation_falls_back_to_letter() {
        let text = "1. Which is a NoSQL database?\n\
                    a) PostgreSQL\nb) MySQL\nc) MongoDB\nd) SQLite\n\
                    Correct Answer: c because it stores documents\n";
        assert_eq!(parse_quiz(text)[0].correct_answer, OptionLabel::C);
    }

    #[test]
    fn test_garbage_input_yields_nothing() {
        assert!(parse_quiz("").is_empty());
        assert!(parse_quiz("No quiz generated.").is_empty());
        assert!(parse_quiz("---\n***\n").is_empty());
    }

    #[test]
    fn test_every_question_has_four_options() {
        for q in parse_quiz(SAMPLE) {
            assert_eq!(q.options.len(), 4);
            assert!(q.options.iter().all(|o| !o.is_empty()));
        }
    }
}
