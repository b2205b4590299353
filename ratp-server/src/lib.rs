//! RATP / Île-de-France Mobilités REST gateway.
//!
//! Resolves human-readable line names and free-text station names into the
//! opaque identifiers of the operator's real-time API, and proxies
//! schedule, stop-list and real-time queries.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod idfm;
pub mod resolver;
pub mod similarity;
pub mod tables;
pub mod web;
