use thiserror::Error;

/// Recommender error types
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown training mode '{0}' (expected one of: rating, audio, listening, genre, tempo, hybrid)")]
    UnknownMode(String),

    #[error("Track '{id}' has rating {rating}, expected 1-10")]
    InvalidRating { id: String, rating: u8 },

    #[error("No API key found. Set OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecommenderError>;
