//! Client-side derivations over store API data.
//!
//! # Services
//!
//! - `cash` - Register summary, movement grouping, closing requests
//! - `dashboard` - Profit and trade series, upcoming payments
//! - `debts` - Receivables and payables, installment payments
//! - `entries` - Expense and income forms
//! - `inventory` - Gold summaries, list filters and sorting, garment form
//! - `parties` - Client and supplier form checks
//! - `trade` - Sale and purchase drafts and submission

pub mod cash;
pub mod dashboard;
pub mod debts;
pub mod entries;
pub mod inventory;
pub mod parties;
pub mod trade;

pub use cash::{CashSummary, CloseRequest, MovementGroups};
pub use dashboard::Dashboard;
pub use debts::{DebtRow, PartyDebts, PaymentInput};
pub use inventory::{GarmentFilter, GarmentForm, GoldSummary};
pub use trade::{PurchaseDraft, SaleDraft};
