//! Recommend CLI - run one recommendation request from a JSON file
//!
//! The input file uses the same shape as the server's request body:
//! `{"ratedTracks": [...], "unratedTracks": [...], "trainingMode": "rating"}`.

use clap::Parser;
use recommender::{
    build_prompt, RecommendationBody, RecommendationRequest, Recommender, RecommenderConfig,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "recommend_cli")]
#[command(about = "Recommend tracks from a rating history file")]
struct Args {
    /// Request file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Override the request's training mode
    #[arg(long)]
    mode: Option<String>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    prompt_only: bool,

    /// Model to use
    #[arg(short, long, default_value = "gpt-4o-mini")]
    model: String,

    /// Backend LLM URL (defaults to the OpenAI API)
    #[arg(short = 'u', long)]
    backend_url: Option<String>,

    /// Backend API key
    #[arg(short = 'k', long)]
    backend_key: Option<String>,

    /// Temperature for sampling
    #[arg(short, long, default_value = "0.3")]
    temperature: f32,
}

/// Read a request file, with `mode` replacing the file's `trainingMode` when given
fn load_request(input: &Path, mode: Option<&str>) -> recommender::Result<RecommendationRequest> {
    let raw = std::fs::read_to_string(input)?;
    let mut body: RecommendationBody = serde_json::from_str(&raw)?;
    if let Some(tag) = mode {
        body.training_mode = Some(tag.to_string());
    }
    RecommendationRequest::try_from(body)
}

fn create_recommender(args: &Args) -> recommender::Result<Recommender> {
    let mut config = RecommenderConfig::new(&args.model).with_temperature(args.temperature);
    if let Some(url) = &args.backend_url {
        config = config.with_base_url(url);
    }
    if let Some(key) = &args.backend_key {
        config = config.with_api_key(key);
    }
    Recommender::new(config)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let request = match load_request(&args.input, args.mode.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load request '{}': {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    if args.prompt_only {
        println!(
            "{}",
            build_prompt(
                &request.rated_tracks,
                &request.unrated_tracks,
                request.training_mode
            )
        );
        return;
    }

    let recommender = match create_recommender(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create recommender: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(recommender.recommend(&request)) {
        Ok(result) => {
            println!("Mode: {}", request.training_mode);
            println!();
            if result.recommendations.is_empty() {
                println!("No recommendations could be resolved.");
            }
            for (i, track) in result.recommendations.iter().enumerate() {
                println!("{}. {} ({})", i + 1, track.name, track.id);
            }
            println!();
            println!("─────────────────────────────────────────────────────────────");
            println!("Reasoning:");
            println!("{}", result.reasoning);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recommender::{Mode, RecommenderError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn request_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const REQUEST: &str = r#"{
        "ratedTracks": [{"id": "r1", "name": "Midnight Harbor", "rating": 9}],
        "unratedTracks": [{"id": "u1", "name": "Aurora Drift"}],
        "trainingMode": "genre"
    }"#;

    #[test]
    fn test_load_request_uses_file_mode() {
        let file = request_file(REQUEST);
        let request = load_request(file.path(), None).unwrap();
        assert_eq!(request.training_mode, Mode::Genre);
        assert_eq!(request.unrated_tracks[0].id, "u1");
    }

    #[test]
    fn test_load_request_mode_override() {
        let file = request_file(REQUEST);
        let request = load_request(file.path(), Some("tempo")).unwrap();
        assert_eq!(request.training_mode, Mode::Tempo);
    }

    #[test]
    fn test_load_request_unknown_override() {
        let file = request_file(REQUEST);
        let err = load_request(file.path(), Some("vibes")).unwrap_err();
        assert!(matches!(err, RecommenderError::UnknownMode(ref tag) if tag == "vibes"));
    }

    #[test]
    fn test_load_request_unknown_file_mode_is_typed_error() {
        let file = request_file(r#"{"unratedTracks": [], "trainingMode": "mood"}"#);
        let err = load_request(file.path(), None).unwrap_err();
        assert!(matches!(err, RecommenderError::UnknownMode(ref tag) if tag == "mood"));
    }

    #[test]
    fn test_load_request_rejects_out_of_range_rating() {
        let file = request_file(
            r#"{"ratedTracks": [{"id": "r1", "name": "Midnight Harbor", "rating": 0}], "unratedTracks": []}"#,
        );
        let err = load_request(file.path(), None).unwrap_err();
        assert!(matches!(err, RecommenderError::InvalidRating { rating: 0, .. }));
    }

    #[test]
    fn test_load_request_missing_file() {
        let err = load_request(Path::new("/nonexistent/request.json"), None).unwrap_err();
        assert!(matches!(err, RecommenderError::Io(_)));
    }
}
