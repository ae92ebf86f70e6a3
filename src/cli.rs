use clap::Parser;

use crate::api_connection::endpoints::OPENROUTER_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Conversational dinner menu suggestion server", long_about = None)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "MENU_CHAT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "MENU_CHAT_PORT", default_value_t = 8000)]
    pub port: u16,

    /// OpenRouter model identifier
    #[arg(short, long, env = "MENU_CHAT_MODEL", default_value = "google/gemini-flash-1.5")]
    pub model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    /// Upper bound on generated tokens per reply
    #[arg(long, default_value_t = 2048)]
    pub max_tokens: u32,

    /// Name of the environment variable that holds the API key
    #[arg(long, default_value = "OPENROUTER_API_KEY")]
    pub api_key_env: String,

    /// Base URL of the OpenRouter-compatible API
    #[arg(long, env = "OPENROUTER_BASE_URL", default_value = OPENROUTER_BASE_URL)]
    pub base_url: String,

    /// Timeout for a single model call, in seconds
    #[arg(long, default_value_t = 60)]
    pub request_timeout_secs: u64,
}

impl Cli {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
