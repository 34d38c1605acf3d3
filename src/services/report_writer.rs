//! 会话报告写入服务
//!
//! 面试记录或测验结果以 JSON 写入报告目录

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{InterviewTranscript, OptionLabel, QuizQuestion, QuizScore};

/// 会话报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionReport {
    Interview {
        generated_at: String,
        model: String,
        transcript: InterviewTranscript,
    },
    Quiz {
        generated_at: String,
        model: String,
        score: QuizScore,
        questions: Vec<QuizQuestion>,
        answers: BTreeMap<u32, OptionLabel>,
    },
}

impl SessionReport {
    pub fn interview(model: impl Into<String>, transcript: InterviewTranscript) -> Self {
        SessionReport::Interview {
            generated_at: now_rfc3339(),
            model: model.into(),
            transcript,
        }
    }

    pub fn quiz(
        model: impl Into<String>,
        score: QuizScore,
        questions: Vec<QuizQuestion>,
        answers: BTreeMap<u32, OptionLabel>,
    ) -> Self {
        SessionReport::Quiz {
            generated_at: now_rfc3339(),
            model: model.into(),
            score,
            questions,
            answers,
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            SessionReport::Interview { .. } => "interview",
            SessionReport::Quiz { .. } => "quiz",
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}

/// 报告写入服务
pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// 写入报告，返回文件路径
    ///
    /// 文件名形如 `interview-20250101-093000.json`，同一秒内重复写入时追加序号
    pub async fn write(&self, report: &SessionReport) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.report_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.report_dir.display().to_string(), e))?;

        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        let mut path = self
            .report_dir
            .join(format!("{}-{}.json", report.file_prefix(), stamp));
        let mut suffix = 1;
        while tokio::fs::try_exists(&path).await.unwrap_or(false) {
            suffix += 1;
            path = self.report_dir.join(format!(
                "{}-{}-{}.json",
                report.file_prefix(),
                stamp,
                suffix
            ));
        }

        let json = serde_json::to_string_pretty(report)?;
        debug!("写入报告: {} ({} 字节)", path.display(), json.len());
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("📝 报告已保存至: {}", path.display());
        Ok(path)
    }
}
