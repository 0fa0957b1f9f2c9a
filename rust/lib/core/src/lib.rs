//! Core domain types for the cellulose load tracker.
//!
//! Everything the other crates agree on lives here: the wire-level
//! records ([`Load`], [`DailySummary`]), the search filter, the fixed
//! option catalogs the plant works with, and the date-time helpers that
//! keep every timestamp in the canonical `yyyy-MM-dd HH:mm:00` shape
//! the backend expects.

pub mod catalog;
pub mod datetime;
pub mod types;

pub use datetime::DateTimeError;
pub use types::{DailySummary, Load, LoadDraft, LoadFilter};
