//! Cached query layer over the cellulose API.
//!
//! Read endpoints are wrapped in caches that serve repeated calls
//! without touching the network until a mutation marks them stale.
//! Mutations take an explicit list of [`QueryKey`]s to invalidate on
//! success, so each screen decides which views its writes affect. A
//! failed mutation invalidates nothing.
//!
//! [`cache`] holds the generic machinery; [`service`] binds it to the
//! `/celulose` endpoints.

pub mod cache;
pub mod service;

mod service_test;

pub use cache::{CachedQuery, KeyedQuery, QueryStatus, RetryPolicy, TransientError};
pub use service::{LoadService, QueryKey, SEARCH_RETRIES};
