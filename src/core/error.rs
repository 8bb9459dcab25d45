use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The inputs were individually valid but the result overflowed `f64`.
    #[error("{quantity} is not representable as a finite number")]
    NonFiniteResult { quantity: &'static str },
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending input, when the error points at one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            Self::NonFiniteResult { .. } => None,
        }
    }
}
