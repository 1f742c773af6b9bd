use thiserror::Error;

/// Failures surfaced by the identity provider client, the user store and
/// the registration orchestrator. Handlers map these to per-endpoint HTTP
/// statuses; the message text is relayed to the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote identity call failed; carries the provider's message
    /// verbatim (duplicate username, weak password, network error — the
    /// provider's wording, not ours).
    #[error("{0}")]
    Provider(String),
    /// The registration pre-check found an existing row for the email.
    #[error("{0}")]
    Duplicate(String),
    /// A local unique index rejected the write.
    #[error("{0}")]
    Constraint(String),
    /// No local row matched the username.
    #[error("{0}")]
    NotFound(String),
    /// Any other database failure.
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}
