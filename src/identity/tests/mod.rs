//! Unit tests for identity management.
