//! # Mock Interview
//!
//! 根据简历和岗位描述进行模拟面试和技术选择题练习的命令行程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端，只暴露"输入提示词、返回文本"的能力
//! - `GeminiClient` - Gemini generateContent 接口
//! - `OpenAiClient` - OpenAI 兼容的 chat completion 接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心终端交互
//! - `RetryingGenerator` - 有界指数退避重试
//! - `QuizService` - 生成并解析选择题
//! - `ReportWriter` - 写 JSON 报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一场面试 / 一次测验"的状态流转
//! - `InterviewSession` - 开场 → 回答 → 点评 + 下一题 → 结束
//! - `QuizSession` - 作答、计分、错题回顾
//!
//! ### ④ 编排层（App）
//! - `app` - 组装资源，驱动终端交互循环
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{interview_loop, quiz_loop, App};
pub use cli::{Cli, Command};
pub use clients::{GeminiClient, LlmClient, OpenAiClient, TextGenerator};
pub use config::{Config, LlmProvider};
pub use error::{AppError, AppResult};
pub use models::{CandidateProfile, OptionLabel, Quiz, QuizQuestion, QuizScore};
pub use services::{parse_quiz, QuizService, RetryPolicy, RetryingGenerator};
pub use workflow::{InterviewSession, QuizSession};
