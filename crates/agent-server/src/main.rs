//! Agent HTTP Server
//!
//! Axum-based front end for the bounded agent loop: one long-lived agent
//! instance with calculator, weather, and web-search tools.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{Agent, AgentConfig, CalculatorTool, GenerationOptions, LlmProvider, ToolRegistry};
use agent_runtime::{OllamaProvider, OpenAiProvider};
use agent_toolkit::{
    CannedSearchClient, GoogleSearchClient, MockWeatherClient, OpenWeatherClient, SearchClient,
    WeatherClient,
    tools::{WeatherTool, WebSearchTool},
};
use tokio::sync::Mutex;

use crate::config::{ProviderKind, ServerConfig};
use crate::handlers::{ask_handler, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize the backend provider
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Ollama => {
            let ollama = OllamaProvider::from_env();
            tracing::info!("Using Ollama backend at {}", ollama.endpoint());
            Arc::new(ollama)
        }
        ProviderKind::OpenAi => {
            tracing::info!("Using OpenAI-compatible backend");
            Arc::new(OpenAiProvider::from_env())
        }
    };

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Backend reachable"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Backend not reachable - asks will fail");
            tracing::warn!("  For Ollama, make sure it is running: ollama serve");
        }
    }

    // Initialize tool clients, falling back to offline implementations when
    // credentials are missing
    let weather_client: Arc<dyn WeatherClient> = match &config.openweather_api_key {
        Some(key) => Arc::new(OpenWeatherClient::new(key.clone())),
        None => {
            tracing::warn!("⚠ OPENWEATHER_API_KEY not set - using mock weather data");
            Arc::new(MockWeatherClient::new())
        }
    };

    let search_client: Arc<dyn SearchClient> =
        match (&config.google_api_key, &config.google_cse_id) {
            (Some(key), Some(cse)) => Arc::new(GoogleSearchClient::new(key.clone(), cse.clone())),
            _ => {
                tracing::warn!("⚠ GOOGLE_API_KEY/GOOGLE_CSE_ID not set - using canned search");
                Arc::new(CannedSearchClient::new())
            }
        };

    // Register tools
    let mut tools = ToolRegistry::new();
    tools.register(CalculatorTool);
    tools.register(WeatherTool::new(weather_client));
    tools.register(WebSearchTool::new(search_client));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // Build the long-lived agent
    let agent_config = AgentConfig {
        system_prompt: config.system_prompt.clone(),
        max_steps: config.max_steps,
        generation: GenerationOptions {
            model: config.model.clone(),
            ..Default::default()
        },
        inject_tool_descriptions: true,
    };
    let agent = Agent::new(provider.clone(), Arc::new(tools), agent_config);

    let state = AppState {
        agent: Arc::new(Mutex::new(agent)),
        provider,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/ask", post(ask_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("agent-server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health   - Health check");
    tracing::info!("  POST /api/ask  - Run the agent on a message");

    axum::serve(listener, app).await?;

    Ok(())
}
