pub mod api_connection;
pub mod cli;
pub mod conversation;
pub mod menu;
pub mod prompts;
pub mod reply_normalizer;
pub mod reply_schema;
pub mod server;
pub mod telemetry;
