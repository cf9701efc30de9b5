//! Error types for matrix operations.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Incompatible matrix dimensions: this {this}, other {other}")]
    DimensionMismatch { this: Shape, other: Shape },

    #[error("invalid elements for matrix {shape}: {reason}")]
    InvalidDimensions { shape: Shape, reason: String },

    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Dimensions of a matrix, rendered as `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
}

impl Shape {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells in a matrix of this shape.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.width, self.height)
    }
}
