pub mod text_loader;

pub use text_loader::{load_candidate_profile, load_text_file};
