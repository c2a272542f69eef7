//! Staff-shift planning: turns per-location arrival events into hourly
//! demand and picks the cheapest mix of full-time and part-time shifts that
//! serves it under a backlog-aware MILP.

pub mod demand;
pub mod error;
pub mod hour;
pub mod policy;
pub mod report;
pub mod scenario;
pub mod shift;
pub mod staffing;

pub use error::{Error, Result};
