//! Unit tests for the analytics context.
