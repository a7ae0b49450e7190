//! Triage: issue tracking lifecycle core.
//!
//! This crate models issues identified by a project code and sequential
//! number, moves them through a closed lifecycle state machine, and
//! dispatches lifecycle commands against a repository with optimistic
//! concurrency control.
//!
//! # Architecture
//!
//! Triage follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`issue`]: Issue aggregate, lifecycle commands, and command dispatch

pub mod issue;
