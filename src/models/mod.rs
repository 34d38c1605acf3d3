pub mod interview;
pub mod loaders;
pub mod profile;
pub mod quiz;

pub use interview::{InterviewStage, InterviewTranscript, InterviewTurn};
pub use loaders::load_candidate_profile;
pub use profile::CandidateProfile;
pub use quiz::{OptionLabel, Quiz, QuizQuestion, QuizScore};
