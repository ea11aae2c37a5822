//! Joyería Core - Shared types library.
//!
//! This crate provides the domain types used across the back-office components:
//! - `admin` - Server-rendered back-office (clients, inventory, cash, debts)
//! - `cli` - Command-line reports against the store API
//!
//! # Architecture
//!
//! The core crate contains only types and formatting helpers - no I/O and no
//! HTTP clients. All business data lives in the remote store API; these types
//! describe what comes back from it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, weights, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
