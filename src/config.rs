//! Configuration shared by all batched mappings.

use crate::error::{RotationError, RotationResult};
use std::fmt;

/// How a batched mapping distributes its per-item work.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Run every item on the calling thread
    Sequential,
    /// Spread items over rayon's global thread pool
    #[default]
    Parallel,
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Sequential => write!(f, "sequential"),
            Execution::Parallel => write!(f, "parallel"),
        }
    }
}

/// Configuration accepted by every mapping in [`crate::mappings`].
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    /// Tolerance of the validity predicates on `‖MᵀM − I‖_F`
    pub epsilon: f64,
    /// Sequential or parallel execution over the batch
    pub execution: Execution,
    /// Iteration cap for the symmetric eigendecomposition (0 means unbounded)
    pub max_iterations: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-7,
            execution: Execution::default(),
            max_iterations: 1000,
        }
    }
}

impl MappingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validity tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the execution mode
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Set the iteration cap of iterative decompositions
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check that the tolerance is usable.
    pub fn validate(&self) -> RotationResult<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(RotationError::InvalidInput(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MappingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MappingConfig {{ epsilon: {:e}, execution: {}, max_iterations: {} }}",
            self.epsilon, self.execution, self.max_iterations
        )
    }
}
