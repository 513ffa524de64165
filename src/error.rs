use thiserror::Error;

/// A view cannot be registered as configured.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("register must be called on a concrete view, not the abstract base")]
    AbstractView,

    #[error("view `{view}` declares method `{method}` more than once")]
    DuplicateMethod { view: String, method: String },
}

/// Failure of [`Registrar::register`](crate::Registrar::register).
///
/// Host failures are passed through untouched: whatever the host returned is
/// what the caller sees. Routes submitted before the failure stay registered.
#[derive(Debug, Error)]
pub enum RegisterError<E> {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Rejected(E),
}

impl<E> RegisterError<E> {
    /// The host error, if the host rejected a route.
    pub fn rejection(&self) -> Option<&E> {
        match self {
            RegisterError::Rejected(err) => Some(err),
            RegisterError::Configuration(_) => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RegisterError::Configuration(_))
    }
}

pub type Result<T, E> = std::result::Result<T, RegisterError<E>>;
