//! Error types for the force-method analyzer.

use thiserror::Error;

/// Main error type for analysis operations.
///
/// Every fatal condition of the pipeline is observable through its variant,
/// not by matching message text. Non-fatal conditions (ill conditioning,
/// asymmetry, degraded substructures) accumulate as warnings on the result
/// instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Node {0} not found in model")]
    NodeNotFound(u32),

    #[error("Bar {0} not found in model")]
    BarNotFound(u32),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Duplicate id {0} already exists")]
    DuplicateId(u32),

    #[error("Invalid model: {0}")]
    ModelInvalid(String),

    #[error("Structure is unstable: {0}")]
    Unstable(String),

    #[error("Cannot select redundants: {0}")]
    CannotSelectRedundants(String),

    #[error("Released primary structure cannot be solved: {0}")]
    SubstructureFailure(String),

    #[error("Compatibility solve failed: {0}")]
    SolverFailure(String),

    #[error("Non-finite value in redundant solution")]
    NonFiniteResult,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for analysis operations.
pub type FlexResult<T> = Result<T, AnalysisError>;
