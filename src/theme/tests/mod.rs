//! Unit tests for the theme catalogue.
