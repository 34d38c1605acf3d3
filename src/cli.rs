//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// 模拟面试与技术测验练习工具
#[derive(Parser, Debug)]
#[command(
    name = "mock-interview",
    version,
    about = "Practice mock interviews and technical quizzes generated from your resume"
)]
pub struct Cli {
    /// TOML 配置文件路径
    #[arg(long, global = true, env = "MOCK_INTERVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a mock interview in the terminal
    Interview {
        /// Resume text file
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Job description text file
        #[arg(long)]
        jd: Option<PathBuf>,

        /// Number of interview questions (overrides config)
        #[arg(long)]
        max_questions: Option<usize>,
    },

    /// Generate and take a multiple-choice quiz
    Quiz {
        /// Resume text file
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Job description text file
        #[arg(long)]
        jd: Option<PathBuf>,

        /// Number of questions to generate (overrides config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Parse saved model output into quiz questions and print them as JSON
    ParseQuiz {
        /// File containing raw model output
        file: PathBuf,
    },
}

impl Command {
    /// 会话类型名称（日志用）
    pub fn mode_name(&self) -> &'static str {
        match self {
            Command::Interview { .. } => "模拟面试",
            Command::Quiz { .. } => "技术测验",
            Command::ParseQuiz { .. } => "测验解析",
        }
    }
}
