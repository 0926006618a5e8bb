use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Target is NaN or infinite.
    NonFiniteTarget(f64),
    /// The weight selector returned nothing for the item at `position`.
    MissingWeight { position: usize },
    /// The weight at `position` is NaN or infinite.
    NonFiniteWeight { position: usize, value: f64 },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteTarget(value) => write!(f, "target must be finite, got {value}"),
            Self::MissingWeight { position } => {
                write!(f, "item at position {position}: no weight field")
            }
            Self::NonFiniteWeight { position, value } => {
                write!(f, "item at position {position}: weight must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for SolverError {}
