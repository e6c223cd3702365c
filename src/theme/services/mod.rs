//! Orchestration services for the theme catalogue.

mod catalogue;

pub use catalogue::{
    ThemeCatalogService, ThemeChanges, ThemeDraft, ThemeServiceError, ThemeServiceResult,
};
