use std::any::type_name;

/// Error while injecting a value from a [`Context`](crate::Context)
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    /// No scope in the ancestor chain publishes the key, or the nearest one published an absent
    /// value
    #[error(
        "injection `{key}` not found; you may have forgotten to wrap it in the corresponding \
         component"
    )]
    NotProvided { key: String },

    /// The key is published, but with a different type than the one requested
    #[error("injection `{key}` is not of type `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },
}

impl InjectError {
    pub(crate) fn not_provided(key: &str) -> Self {
        Self::NotProvided {
            key: key.to_owned(),
        }
    }

    pub(crate) fn type_mismatch<T>(key: &str) -> Self {
        Self::TypeMismatch {
            key: key.to_owned(),
            expected: type_name::<T>(),
        }
    }

    /// The key that failed to resolve
    pub fn key(&self) -> &str {
        match self {
            Self::NotProvided { key } | Self::TypeMismatch { key, .. } => key,
        }
    }
}
