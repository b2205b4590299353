//! Île-de-France Mobilités transit API client.
//!
//! Thin, read-only queries against the operator's line API: schedules,
//! stop areas and real-time passages. Line and station ids are opaque
//! upstream identifiers obtained from the [`tables`](crate::tables) and the
//! [`resolver`](crate::resolver).

mod client;
mod error;
mod types;

pub use client::{DEFAULT_HOST, Endpoint, TransitClient, TransitConfig};
pub use error::TransitError;
pub use types::StationRecord;
