//! Read-only aggregation over the task store.
//!
//! The summary counts tasks per status, theme and assignee and reports how
//! many open tasks are past their due date. It never writes.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
