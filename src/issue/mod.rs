//! Issue lifecycle management for Triage.
//!
//! This module implements issue creation through validated construction,
//! the lifecycle state machine driven by [`domain::StateChangeCommand`],
//! typed links between issues, and command dispatch that persists accepted
//! changes under optimistic concurrency. Rejected commands never reach the
//! repository. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
