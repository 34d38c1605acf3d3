//! 应用编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：会话日志文件、启动信息
//! 2. **资源组装**：按配置创建 LLM 客户端和重试策略
//! 3. **终端交互**：读取标准输入，驱动面试 / 测验流程
//! 4. **结果落盘**：写会话日志和 JSON 报告
//!
//! 交互循环对输入输出做了泛化（`AsyncBufRead` + `Write`），便于测试

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

use crate::cli::Command;
use crate::clients::{LlmClient, TextGenerator};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::loaders::load_text_file;
use crate::models::{CandidateProfile, OptionLabel, Quiz, QuizScore};
use crate::services::{parse_quiz, QuizService, ReportWriter, RetryPolicy, RetryingGenerator, SessionReport};
use crate::utils::logging::{append_log, init_log_file, log_startup};
use crate::workflow::{InterviewSession, QuizSession};

const QUIT_COMMAND: &str = "/quit";

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    ///
    /// `parse-quiz` 不调用模型，也不写会话日志
    pub fn initialize(config: Config, command: &Command) -> Result<Self> {
        if !matches!(command, Command::ParseQuiz { .. }) {
            init_log_file(&config.output_log_file, command.mode_name())?;
            log_startup(
                command.mode_name(),
                &config.llm_provider.to_string(),
                &config.llm_model_name,
            );
        }
        Ok(Self { config })
    }

    /// 运行子命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Interview {
                resume,
                jd,
                max_questions,
            } => {
                let max_questions = max_questions.unwrap_or(self.config.max_interview_questions);
                self.run_interview(resume.as_deref(), jd.as_deref(), max_questions)
                    .await
            }
            Command::Quiz { resume, jd, count } => {
                let count = count.unwrap_or(self.config.quiz_question_count);
                self.run_quiz(resume.as_deref(), jd.as_deref(), count).await
            }
            Command::ParseQuiz { file } => self.run_parse_quiz(&file).await,
        }
    }

    fn generator(&self) -> AppResult<RetryingGenerator<LlmClient>> {
        let client = LlmClient::from_config(&self.config)?;
        Ok(RetryingGenerator::new(
            client,
            RetryPolicy::from_config(&self.config),
        ))
    }

    async fn run_interview(
        &self,
        resume: Option<&Path>,
        jd: Option<&Path>,
        max_questions: usize,
    ) -> Result<()> {
        let profile = CandidateProfile::load(resume, jd).await?;
        let mut session = InterviewSession::new(self.generator()?, profile, max_questions);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut out = std::io::stdout();
        let result = interview_loop(
            &mut session,
            &mut lines,
            &mut out,
            Some(self.config.output_log_file.as_str()),
        )
        .await;

        // 中途出错也保存已有记录
        if !session.transcript().is_empty() {
            let report = SessionReport::interview(session.model_name(), session.transcript().clone());
            self.save_report(&report).await;
        }
        result?;

        info!(
            "✅ 面试完成: 回答 {}/{} 题",
            session.transcript().answered_count(),
            session.max_questions()
        );
        info!("日志已保存至: {}", self.config.output_log_file);
        Ok(())
    }

    async fn run_quiz(&self, resume: Option<&Path>, jd: Option<&Path>, count: usize) -> Result<()> {
        let profile = CandidateProfile::load(resume, jd).await?;
        let quiz = generate_quiz(self.generator()?, &profile, count).await?;
        if let Err(e) = append_log(&self.config.output_log_file, "模型原始输出", &quiz.raw_text) {
            warn!("写入会话日志失败: {}", e);
        }

        let mut session = QuizSession::new(quiz);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut out = std::io::stdout();
        let score = quiz_loop(&mut session, &mut lines, &mut out).await?;

        if let Err(e) = append_log(&self.config.output_log_file, "得分", &score.to_string()) {
            warn!("写入会话日志失败: {}", e);
        }
        self.save_report(&session.to_report(&self.config.llm_model_name))
            .await;

        info!("✅ 测验完成: {}", score);
        Ok(())
    }

    async fn run_parse_quiz(&self, file: &Path) -> Result<()> {
        let raw_text = load_text_file(file).await?;
        let questions = parse_quiz(&raw_text);
        if questions.is_empty() {
            warn!("⚠️ 未能从 {} 解析出任何题目", file.display());
        } else {
            info!("✓ 解析出 {} 道题", questions.len());
        }

        let mut out = std::io::stdout();
        writeln!(out, "{}", serde_json::to_string_pretty(&questions)?)?;
        Ok(())
    }

    /// 报告写入失败只告警，不影响本次会话结果
    async fn save_report(&self, report: &SessionReport) -> Option<PathBuf> {
        match ReportWriter::new(&self.config.report_dir).write(report).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("⚠️ 报告保存失败: {}", e);
                None
            }
        }
    }
}

async fn generate_quiz<G: TextGenerator>(
    generator: RetryingGenerator<G>,
    profile: &CandidateProfile,
    count: usize,
) -> AppResult<Quiz> {
    QuizService::new(generator).generate(profile, count).await
}

/// 一次读取到的回答
enum AnswerInput {
    Answer { text: String, eof: bool },
    Quit,
}

/// 读取一段多行回答：空行结束，`/quit` 退出
///
/// 输入结束时，已有内容作为回答提交，否则视为退出
async fn read_answer<G, R, W>(
    session: &mut InterviewSession<G>,
    lines: &mut Lines<R>,
    out: &mut W,
) -> AppResult<AnswerInput>
where
    G: TextGenerator,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        let Some(line) = lines.next_line().await? else {
            if session.draft().is_empty() {
                return Ok(AnswerInput::Quit);
            }
            return Ok(AnswerInput::Answer {
                text: session.take_draft(),
                eof: true,
            });
        };

        let line = line.trim();
        if line.eq_ignore_ascii_case(QUIT_COMMAND) {
            return Ok(AnswerInput::Quit);
        }
        if !line.is_empty() {
            session.append_transcript_fragment(line);
            continue;
        }
        if session.draft().is_empty() {
            writeln!(out, "Answer cannot be empty. Type your answer, then press Enter on an empty line.")?;
            out.flush()?;
            continue;
        }
        return Ok(AnswerInput::Answer {
            text: session.take_draft(),
            eof: false,
        });
    }
}

/// 面试交互循环
///
/// - 回答可跨多行，以空行结束
/// - 模型调用失败时保留回答，空行即可重新提交
/// - `log_file` 不为空时把问答追加到会话日志
pub async fn interview_loop<G, R, W>(
    session: &mut InterviewSession<G>,
    lines: &mut Lines<R>,
    out: &mut W,
    log_file: Option<&str>,
) -> AppResult<()>
where
    G: TextGenerator,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let opening = session.start().await?.to_string();
    write_block(out, "Interviewer", &opening)?;
    log_entry(log_file, "面试官", &opening);

    while !session.is_finished() {
        writeln!(
            out,
            "[{}/{}] Your answer (empty line to submit, {} to stop):",
            session.question_count(),
            session.max_questions(),
            QUIT_COMMAND
        )?;
        out.flush()?;

        let (answer, eof) = match read_answer(session, lines, out).await? {
            AnswerInput::Answer { text, eof } => (text, eof),
            AnswerInput::Quit => {
                info!("面试已由用户结束");
                writeln!(out, "Interview ended.")?;
                return Ok(());
            }
        };

        match session.submit_answer(&answer).await {
            Ok(reply) => {
                let reply = reply.to_string();
                log_entry(log_file, "候选人", &answer);
                write_block(out, "Interviewer", &reply)?;
                log_entry(log_file, "面试官", &reply);
            }
            Err(AppError::Llm(e)) if !eof => {
                warn!("❌ 获取面试反馈失败: {}", e);
                session.append_transcript_fragment(&answer);
                writeln!(out, "Could not reach the interviewer. Press Enter to resend your answer.")?;
            }
            Err(e) => return Err(e),
        }
    }

    writeln!(out, "Interview complete. Thank you!")?;
    out.flush()?;
    Ok(())
}

/// 测验交互循环：逐题读取 a-d，输入结束或 `/quit` 时提前交卷
pub async fn quiz_loop<R, W>(
    session: &mut QuizSession,
    lines: &mut Lines<R>,
    out: &mut W,
) -> AppResult<QuizScore>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let questions = session.questions().to_vec();
    let total = questions.len();

    'questions: for question in &questions {
        writeln!(out, "\nQ{}/{}. {}", question.id, total, question.question)?;
        for label in OptionLabel::ALL {
            writeln!(out, "  {}) {}", label, question.option(label))?;
        }

        let label = loop {
            write!(out, "Your choice (a-d): ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break 'questions;
            };
            if line.trim().eq_ignore_ascii_case(QUIT_COMMAND) {
                break 'questions;
            }
            match line.parse::<OptionLabel>() {
                Ok(label) => break label,
                Err(_) => writeln!(out, "Please enter a, b, c or d.")?,
            }
        };

        if session.answer(question.id, label)? {
            writeln!(out, "✓ Correct!")?;
        } else {
            writeln!(
                out,
                "✗ Wrong. Correct answer: {}) {}",
                question.correct_answer,
                question.correct_option()
            )?;
        }
    }

    let score = session.score();
    writeln!(out, "\nScore: {}", score)?;
    let review = session.review();
    if !review.is_empty() {
        writeln!(out, "Review:")?;
        for item in &review {
            writeln!(
                out,
                "  Q{} {}\n     you chose {}), correct answer: {}) {}",
                item.id, item.question, item.chosen, item.correct, item.correct_text
            )?;
        }
    }
    out.flush()?;
    Ok(score)
}

fn write_block<W: Write>(out: &mut W, speaker: &str, text: &str) -> AppResult<()> {
    writeln!(out, "\n{}:\n{}\n", speaker, text.trim())?;
    out.flush()?;
    Ok(())
}

fn log_entry(log_file: Option<&str>, label: &str, text: &str) {
    if let Some(path) = log_file {
        if let Err(e) = append_log(path, label, text) {
            warn!("写入会话日志失败: {}", e);
        }
    }
}
