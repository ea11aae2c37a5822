//! Records exchanged with the store API.
//!
//! Field names follow the API's Spanish JSON keys so the structs decode
//! without per-field renames.

pub mod cash;
pub mod common;
pub mod credit;
pub mod domains;
pub mod entries;
pub mod garments;
pub mod parties;
pub mod trade;

pub use cash::*;
pub use common::parse_date_prefix;
pub use credit::*;
pub use domains::*;
pub use entries::*;
pub use garments::*;
pub use parties::*;
pub use trade::*;
