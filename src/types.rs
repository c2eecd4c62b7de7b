use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::RecommenderError;

/// Valid user rating scale
pub const RATING_RANGE: RangeInclusive<u8> = 1..=10;

/// A song candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    /// User rating on a 1-10 scale, absent for unrated tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Track {
    pub fn unrated(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating: None,
        }
    }

    pub fn rated(id: impl Into<String>, name: impl Into<String>, rating: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating: Some(rating),
        }
    }
}

/// Analysis mode selecting the prompt framing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Rating,
    Audio,
    Listening,
    Genre,
    Tempo,
    Hybrid,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Rating,
        Mode::Audio,
        Mode::Listening,
        Mode::Genre,
        Mode::Tempo,
        Mode::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Rating => "rating",
            Mode::Audio => "audio",
            Mode::Listening => "listening",
            Mode::Genre => "genre",
            Mode::Tempo => "tempo",
            Mode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RecommenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| RecommenderError::UnknownMode(s.to_string()))
    }
}

/// Inbound recommendation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub rated_tracks: Vec<Track>,
    #[serde(default)]
    pub unrated_tracks: Vec<Track>,
    #[serde(default)]
    pub training_mode: Mode,
}

impl RecommendationRequest {
    pub fn new(rated_tracks: Vec<Track>, unrated_tracks: Vec<Track>) -> Self {
        Self {
            rated_tracks,
            unrated_tracks,
            training_mode: Mode::default(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.training_mode = mode;
        self
    }

    /// Reject ratings outside the 1-10 scale on either track list
    pub fn validate(&self) -> Result<(), RecommenderError> {
        let out_of_range = self
            .rated_tracks
            .iter()
            .chain(&self.unrated_tracks)
            .find_map(|t| t.rating.filter(|r| !RATING_RANGE.contains(r)).map(|r| (t, r)));

        match out_of_range {
            Some((track, rating)) => Err(RecommenderError::InvalidRating {
                id: track.id.clone(),
                rating,
            }),
            None => Ok(()),
        }
    }
}

/// Request body as it arrives from outside the crate.
///
/// `trainingMode` stays a string so unknown tags are reported as
/// [`RecommenderError::UnknownMode`] rather than a generic deserialization
/// failure. Convert with `RecommendationRequest::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBody {
    #[serde(default)]
    pub rated_tracks: Vec<Track>,
    #[serde(default)]
    pub unrated_tracks: Vec<Track>,
    #[serde(default)]
    pub training_mode: Option<String>,
}

impl TryFrom<RecommendationBody> for RecommendationRequest {
    type Error = RecommenderError;

    fn try_from(body: RecommendationBody) -> Result<Self, Self::Error> {
        let mode = match body.training_mode.as_deref() {
            Some(tag) => tag.parse::<Mode>()?,
            None => Mode::default(),
        };
        let request =
            RecommendationRequest::new(body.rated_tracks, body.unrated_tracks).with_mode(mode);
        request.validate()?;
        Ok(request)
    }
}

/// Interpreted model output
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResult {
    /// At most five tracks drawn from the unrated candidates, in the order the model listed them
    pub recommendations: Vec<Track>,
    /// Verbatim completion text
    pub reasoning: String,
}

/// Configuration for the recommender
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Base URL for API (optional, for custom endpoints)
    pub base_url: Option<String>,
    /// API key (optional, can use env vars)
    pub api_key: Option<String>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: None,
            base_url: None,
            api_key: None,
        }
    }
}

impl RecommenderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn with_max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}
