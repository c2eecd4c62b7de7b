//! JSON response types for the recommendation server
//!
//! Request bodies use [`recommender::RecommendationBody`] directly.

use recommender::Mode;
use serde::Serialize;

/// Response body for `/api/prompt`
#[derive(Debug, Clone, Serialize)]
pub struct PromptResponse {
    pub mode: Mode,
    pub prompt: String,
}

/// Error body shared by all endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Failed to get recommendations")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Failed to get recommendations" }));
    }

    #[test]
    fn test_prompt_response_serializes_mode_tag() {
        let json = serde_json::to_value(PromptResponse {
            mode: Mode::Hybrid,
            prompt: "p".to_string(),
        })
        .unwrap();
        assert_eq!(json["mode"], "hybrid");
    }
}
