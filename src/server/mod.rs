//! HTTP surface: `GET /`, `GET /start` and `POST /chat`.

pub mod handlers;
pub mod router;

use crate::conversation::ConversationDriver;

pub use router::build_router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub driver: ConversationDriver,
}

impl AppState {
    pub fn new(driver: ConversationDriver) -> Self {
        Self { driver }
    }
}
