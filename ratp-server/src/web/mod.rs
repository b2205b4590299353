//! Web layer.
//!
//! Thin JSON endpoints over the resolver and the transit API client.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
