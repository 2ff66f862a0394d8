//! Error types for sketch and simulation operations

use std::fmt;
use std::io;

/// Errors that can occur during sketch operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Invalid parameter provided to a sketch constructor or operation
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Invalid value provided
        value: String,
        /// Constraint that was violated
        constraint: String,
    },

    /// Operation the sketch variant does not offer
    UnsupportedOperation {
        /// Name of the refused operation
        operation: String,
        /// Reason the variant refuses it
        reason: String,
    },
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}': value '{}' {}",
                    param, value, constraint
                )
            }
            SketchError::UnsupportedOperation { operation, reason } => {
                write!(f, "Unsupported operation '{}': {}", operation, reason)
            }
        }
    }
}

impl std::error::Error for SketchError {}

/// Result type alias for sketch operations
pub type Result<T> = std::result::Result<T, SketchError>;

/// Errors surfaced by the streaming driver
///
/// Sketch-level invariant violations and stream I/O failures are fatal to a
/// run; the driver terminates with the diagnostic carried here. Evaluator
/// empty-data conditions are not errors and never reach this type.
#[derive(Debug)]
pub enum SimulationError {
    /// A sketch rejected a parameter or operation
    Sketch(SketchError),
    /// Stream, config, or results-log I/O failure
    Io(io::Error),
    /// Malformed config file or results log
    Json(serde_json::Error),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Sketch(err) => write!(f, "{}", err),
            SimulationError::Io(err) => write!(f, "I/O error: {}", err),
            SimulationError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Sketch(err) => Some(err),
            SimulationError::Io(err) => Some(err),
            SimulationError::Json(err) => Some(err),
        }
    }
}

impl From<SketchError> for SimulationError {
    fn from(err: SketchError) -> Self {
        SimulationError::Sketch(err)
    }
}

impl From<io::Error> for SimulationError {
    fn from(err: io::Error) -> Self {
        SimulationError::Io(err)
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = SketchError::InvalidParameter {
            param: "width".to_string(),
            value: "0".to_string(),
            constraint: "must be greater than 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("width"));
        assert!(msg.contains("must be greater than 0"));
    }

    #[test]
    fn test_simulation_error_wraps_sketch_error() {
        let err = SketchError::UnsupportedOperation {
            operation: "add".to_string(),
            reason: "only unit increments".to_string(),
        };
        let sim: SimulationError = err.clone().into();
        assert_eq!(sim.to_string(), err.to_string());
    }
}
