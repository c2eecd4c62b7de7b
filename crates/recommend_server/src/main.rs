//! Recommendation Server - HTTP API over the track recommender

mod handlers;
mod types;

use axum::{routing::{get, post}, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::{health, preview_prompt, recommend, AppState};
use recommender::{Recommender, RecommenderConfig};

/// Recommendation Server - rating-driven track recommendations over HTTP
#[derive(Parser, Debug)]
#[command(name = "recommend-server")]
#[command(about = "Serve track recommendations from a chat-completion backend")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Model to use for completions
    #[arg(short, long, default_value = "gpt-4o-mini")]
    model: String,

    /// Backend LLM URL (e.g., http://localhost:11434/v1 for Ollama); defaults to the OpenAI API
    #[arg(short = 'u', long)]
    backend_url: Option<String>,

    /// Backend API key (optional, uses OPENAI_API_KEY env var if not provided)
    #[arg(short = 'k', long)]
    backend_key: Option<String>,

    /// Sampling temperature
    #[arg(short, long, default_value = "0.3")]
    temperature: f32,
}

fn recommender_config(args: &Args) -> RecommenderConfig {
    let mut config = RecommenderConfig::new(&args.model).with_temperature(args.temperature);
    if let Some(url) = &args.backend_url {
        config = config.with_base_url(url);
    }
    if let Some(key) = &args.backend_key {
        config = config.with_api_key(key);
    }
    config
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let recommender = match Recommender::new(recommender_config(&args)) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to create recommender: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState { recommender });

    // CORS configuration for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/api/recommend", post(recommend))
        .route("/api/prompt", post(preview_prompt))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Recommendation server starting on {}", addr);
    tracing::info!("Model: {}", args.model);
    tracing::info!(
        "Backend URL: {}",
        args.backend_url.as_deref().unwrap_or("https://api.openai.com/v1")
    );

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
