//! Application services for account management.

mod account;

pub use account::{AccountError, AccountService, RegisterRequest, UpdateProfileRequest};
