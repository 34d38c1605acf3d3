pub mod interview_session;
pub mod quiz_session;

pub use interview_session::InterviewSession;
pub use quiz_session::{QuestionReview, QuizSession};
