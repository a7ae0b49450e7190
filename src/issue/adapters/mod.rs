//! Adapter implementations for issue ports.

pub mod memory;
