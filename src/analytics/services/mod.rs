//! Analytics services.

mod summary;

pub use summary::{AnalyticsError, AnalyticsService};
