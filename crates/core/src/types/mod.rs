//! Core types for the order counter.

pub mod count;
pub mod credential;
pub mod period;
pub mod range;

pub use count::{CountError, OrderCountResult};
pub use credential::StoreCredential;
pub use period::{Period, PeriodError, WEEK_START};
pub use range::DateRange;
