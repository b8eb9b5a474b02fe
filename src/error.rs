//! The error taxonomy shared by every operator and collection.
//!
//! Operators that must produce a singular value (`first`, `single`, `min`,
//! `max`, `average`, seedless `aggregate`) fail with `EmptySequence` rather
//! than returning a sentinel. Operators that can legitimately yield nothing
//! (`where_by`, `select`, `take`, ...) never fail for emptiness. Errors from
//! user-supplied callbacks are never caught or downgraded; they propagate to
//! the caller untouched.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the sequence engine and the eager shells can surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A value-producing reducer ran on a sequence with zero elements.
    #[error("sequence contains no elements")]
    EmptySequence,

    /// `single` (or `single_or`) matched more than one element.
    #[error("sequence contains more than one matching element")]
    AmbiguousMatch,

    /// Two values with no comparison capability and no common ordering.
    #[error("cannot compare {left} with {right}")]
    InvalidComparison {
        /// Kind of the left operand.
        left: String,
        /// Kind of the right operand.
        right: String,
    },

    /// Malformed input to a public entry point.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value that cannot be coerced to a map key was used as one.
    #[error("value of kind {0} is not allowed as a key")]
    KeyNotAllowed(String),

    /// A lookup on an eager map shell missed.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The pull protocol was violated: `current` or `key` was called while
    /// the cursor holds no element. Callers must check `is_valid` first.
    #[error("cursor has no current element")]
    NoCurrentElement,

    /// A failure raised inside a user-supplied callback.
    #[error("{0}")]
    Callback(String),
}

impl Error {
    /// Build an `InvalidArgument` from anything printable.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        return Error::InvalidArgument(message.into());
    }

    /// Build a callback failure from anything printable.
    pub fn callback(message: impl Into<String>) -> Error {
        return Error::Callback(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::EmptySequence.to_string(),
            "sequence contains no elements"
        );
        assert_eq!(
            Error::KeyNotFound("name".to_string()).to_string(),
            "key not found: name"
        );
        let e = Error::InvalidComparison {
            left: "int".to_string(),
            right: "point".to_string(),
        };
        assert_eq!(e.to_string(), "cannot compare int with point");
    }

    #[test]
    fn helpers_build_expected_variants() {
        assert_eq!(
            Error::invalid_argument("step must not be zero"),
            Error::InvalidArgument("step must not be zero".to_string())
        );
        assert_eq!(
            Error::callback("boom"),
            Error::Callback("boom".to_string())
        );
    }
}
