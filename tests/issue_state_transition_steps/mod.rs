//! Step definitions for issue lifecycle BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;
