pub mod prompts;
pub mod quiz_parser;
pub mod quiz_service;
pub mod report_writer;
pub mod retry;

pub use quiz_parser::parse_quiz;
pub use quiz_service::QuizService;
pub use report_writer::{ReportWriter, SessionReport};
pub use retry::{with_retry, RetryPolicy, RetryingGenerator};
