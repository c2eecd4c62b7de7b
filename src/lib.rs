//! # Track Recommender
//!
//! Turns a listener's rating history into a short list of recommended
//! tracks by prompting a chat-completion model and interpreting its reply.

pub mod error;
pub mod parsing;
pub mod prompts;
pub mod types;

mod recommender;

// Re-exports
pub use error::{RecommenderError, Result};
pub use parsing::interpret;
pub use prompts::{build_prompt, MAX_RECOMMENDATIONS};
pub use recommender::Recommender;
pub use types::{Mode, RecommendationBody, RecommendationRequest, RecommendationResult, RecommenderConfig, Track};
