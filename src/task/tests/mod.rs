//! Unit tests for tasks, the transition engine and the history log.
