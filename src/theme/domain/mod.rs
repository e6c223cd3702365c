//! Domain model for themes.

mod error;
mod theme;

pub use error::ThemeDomainError;
pub use theme::{PersistedThemeData, Theme, ThemeId, ThemeName};
