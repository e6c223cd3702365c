//! Cross-cutting error classification shared by every service.

/// Client-facing failure category of a service error.
///
/// Services expose `kind()` so the HTTP layer can map failures to status
/// codes without matching on every variant of every context's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced task, theme or user does not exist.
    NotFound,
    /// Input failed validation or violated a uniqueness rule.
    InvalidArgument,
    /// The authorization gate denied the operation.
    Forbidden,
    /// The caller presented no credential or an invalid one.
    Unauthorized,
    /// Infrastructure failure; details are logged, not returned.
    Internal,
}
