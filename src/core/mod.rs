//! Core primitives.
//!
//! Transport-free building blocks shared across the broker.

pub mod rng;

pub use rng::DeterministicRng;
