//! Error types for the nutrition core

use crate::validation::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading models, predicting or blending feed
#[derive(Error, Debug)]
pub enum NutritionError {
    /// Model artifact is structurally invalid
    #[error("Malformed model data: {0}")]
    MalformedModel(String),

    /// A declared target has no scaler or no forest
    #[error("Missing target data for '{target}': no entry in {section}")]
    MissingTargetData {
        target: String,
        section: &'static str,
    },

    /// Vector or parameter lengths disagree
    #[error("Dimension mismatch in {context}: expected {expected}, found {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Request rejected before inference
    #[error(transparent)]
    InvalidRequest(#[from] ValidationError),

    /// No available ingredient can fill a mandatory feed role
    #[error("Cannot satisfy {role} role: no available ingredient qualifies")]
    UnsatisfiedRole { role: String },

    /// Predicted requirement cannot drive a blend
    #[error("Invalid nutrient requirement: {0}")]
    InvalidRequirement(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for nutrition core operations
pub type Result<T> = std::result::Result<T, NutritionError>;
