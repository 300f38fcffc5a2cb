/// Error while publishing a value into a [`Context`](crate::Context)
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvideError {
    /// The key has already been provided in the same scope
    #[error("key `{0}` is already provided in this scope")]
    AlreadyProvided(String),
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WithdrawError {
    /// The key is not provided in this scope
    #[error("key `{0}` is not provided in this scope")]
    NotProvided(String),
}
