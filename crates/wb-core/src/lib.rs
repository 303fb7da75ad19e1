//! Core domain logic for workbill.
//!
//! This crate contains the fundamental types and logic for:
//! - Validated amounts: non-negative rates and travel distances
//! - Session lifecycle: the idle/open/closed state of a work session
//! - Billing: turning a session and a rate configuration into a cost breakdown

pub mod billing;
pub mod session;
pub mod types;

pub use billing::{CostBreakdown, RateConfig, STANDARD_FEE, breakdown, total};
pub use session::{Session, SessionState};
pub use types::{Km, Rate, ValidationError};
