//! Domain types for the transit gateway.
//!
//! Canonical categories, the upstream mode vocabulary mapped onto them,
//! line metadata and station identifiers.

mod category;
mod line;
mod mode;
mod station;

pub use category::{Category, InvalidCategory};
pub use line::LineRecord;
pub use mode::{ModeTable, UnknownTransportMode};
pub use station::StationId;
