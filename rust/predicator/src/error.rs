use thiserror::Error;

use crate::Variable;

/// Errors raised while matching terms or resolving predicates.
///
/// A term pair that fails to unify is not an error: matching operations
/// report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredicatorError {
    /// A query variable was read or resolved but never declared
    #[error("Unknown variable {variable}")]
    UnknownVariable { variable: Variable },

    /// A compound term was supplied where a plain term is required
    #[error("Invalid term: {message}")]
    InvalidTerm { message: String },

    /// A host payload failed to compare itself with another one
    #[error("Payload comparison failed: {message}")]
    Payload { message: String },

    /// A host-defined predicate failed
    #[error("Predicate {name} failed: {message}")]
    Predicate { name: String, message: String },
}

impl PredicatorError {
    pub fn unknown_variable(variable: &Variable) -> Self {
        PredicatorError::UnknownVariable {
            variable: variable.clone(),
        }
    }

    pub fn predicate<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        PredicatorError::Predicate {
            name: name.into(),
            message: message.into(),
        }
    }
}
