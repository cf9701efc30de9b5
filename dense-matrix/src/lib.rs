//! Dense generic matrices with worker-pool multiplication.
//!
//! `dense-matrix` provides [`Matrix<T>`] for any numeric element type with
//! element-wise addition, negation and subtraction, plus a multiplication
//! that spreads the output cells across a bounded pool of worker tasks.
//!
//! # Multiplication
//!
//! - **Jobs**: one per output cell, enumerated in row-major order
//! - **Workers**: one per available hardware thread by default
//! - **Queues**: bounded job and result queues (capacity [`BATCH_SIZE`])
//! - **Reassembly**: results carry their `(row, column)` and are placed by
//!   index, so completion order is irrelevant
//!
//! # Example
//!
//! ```
//! use dense_matrix::Matrix;
//!
//! let a = Matrix::from_rows(3, 2, vec![vec![1, 2, 3], vec![4, 5, 6]])?;
//! let c = Matrix::from_rows(
//!     4,
//!     3,
//!     vec![vec![1, 1, 0, 0], vec![2, 1, 0, 1], vec![3, 1, 1, 0]],
//! )?;
//!
//! let product = a.multiply_by(&c)?;
//! assert_eq!(product.width(), 4);
//! assert_eq!(product.height(), 2);
//! assert_eq!(
//!     product.into_rows(),
//!     vec![vec![14, 6, 3, 2], vec![32, 15, 6, 5]]
//! );
//! # Ok::<(), dense_matrix::Error>(())
//! ```

mod element;
mod error;
mod matrix;
mod multiply;

pub use element::Element;
pub use error::{Error, Shape};
pub use matrix::Matrix;
pub use multiply::{BATCH_SIZE, Multiplier, available_workers};
