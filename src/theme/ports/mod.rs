//! Port contracts for the theme catalogue.

pub mod repository;

pub use repository::{
    ThemeReferences, ThemeRepository, ThemeRepositoryError, ThemeRepositoryResult,
};
