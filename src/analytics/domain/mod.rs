//! Analytics domain types.

mod summary;

pub use summary::AnalyticsSummary;
