//! Agent Tools
//!
//! Domain tools that implement `agent_core::Tool` over the service clients.

mod weather_lookup;
mod web_search;

pub use weather_lookup::WeatherTool;
pub use web_search::WebSearchTool;
