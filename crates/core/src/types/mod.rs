//! Core types for the jewelry back-office.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;
pub mod weight;

pub use id::*;
pub use money::Money;
pub use status::*;
pub use weight::Grams;
