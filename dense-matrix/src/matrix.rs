//! Dense row-major matrix and its sequential operations.

use std::ops::{Index, Mul, Neg};

use crate::element::Element;
use crate::error::{Error, Shape};
use crate::multiply::Multiplier;

/// A dense matrix stored as `height` rows of `width` elements each.
///
/// Every operation returns a new matrix; inputs are never mutated.
///
/// # Example
///
/// ```
/// use dense_matrix::Matrix;
///
/// let a = Matrix::from_rows(3, 2, vec![vec![1, 2, 3], vec![4, 5, 6]])?;
/// let b = Matrix::from_rows(3, 2, vec![vec![2, 2, 2], vec![2, 2, 2]])?;
///
/// let sum = a.add(&b)?;
/// assert_eq!(sum.into_rows(), vec![vec![3, 4, 5], vec![6, 7, 8]]);
/// # Ok::<(), dense_matrix::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    width: usize,
    height: usize,
    elements: Vec<Vec<T>>,
}

impl<T: Element> Matrix<T> {
    /// Creates a `width` x `height` matrix filled with zeros.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            elements: vec![vec![T::zero(); width]; height],
        }
    }

    /// Wraps row-major `elements` as a `width` x `height` matrix.
    ///
    /// Fails with [`Error::InvalidDimensions`] unless there are exactly
    /// `height` rows of exactly `width` elements each.
    pub fn from_rows(width: usize, height: usize, elements: Vec<Vec<T>>) -> Result<Self, Error> {
        let shape = Shape::new(width, height);
        if elements.len() != height {
            return Err(Error::InvalidDimensions {
                shape,
                reason: format!("expected {} rows, got {}", height, elements.len()),
            });
        }
        if let Some((r, row)) = elements.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(Error::InvalidDimensions {
                shape,
                reason: format!("row {} has {} elements, expected {}", r, row.len(), width),
            });
        }

        Ok(Self::from_parts(shape, elements))
    }

    pub(crate) fn from_parts(shape: Shape, elements: Vec<Vec<T>>) -> Self {
        debug_assert_eq!(elements.len(), shape.height);
        Self {
            width: shape.width,
            height: shape.height,
            elements,
        }
    }

    /// Element-wise sum of two matrices of the same shape.
    pub fn add(&self, other: &Matrix<T>) -> Result<Matrix<T>, Error> {
        if self.shape() != other.shape() {
            return Err(Error::DimensionMismatch {
                this: self.shape(),
                other: other.shape(),
            });
        }

        let elements = self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| x + y).collect())
            .collect();
        Ok(Self::from_parts(self.shape(), elements))
    }

    /// Single-threaded reference product, `self` x `other`.
    ///
    /// Follows the same conformability rule as [`Matrix::multiply_by`].
    pub fn multiply_sequential(&self, other: &Matrix<T>) -> Result<Matrix<T>, Error>
    where
        T: Mul<Output = T>,
    {
        ensure_multipliable(self, other)?;

        let shape = Shape::new(other.width, self.height);
        let mut elements = vec![vec![T::zero(); shape.width]; shape.height];
        for (r, out) in elements.iter_mut().enumerate() {
            for (c, cell) in out.iter_mut().enumerate() {
                *cell = dot(self, other, r, c);
            }
        }
        Ok(Self::from_parts(shape, elements))
    }

    /// Matrix product `self` x `other`, computed on a pool of worker threads
    /// sized to the available hardware parallelism.
    ///
    /// `self.width()` must equal `other.height()`; the result has
    /// `other.width()` columns and `self.height()` rows.
    ///
    /// Blocks the calling thread. Async callers that should not block can
    /// use [`Multiplier::multiply`] instead.
    pub fn multiply_by(&self, other: &Matrix<T>) -> Result<Matrix<T>, Error>
    where
        T: Mul<Output = T>,
    {
        Multiplier::new().multiply_blocking(self, other)
    }
}

impl<T: Element + Neg<Output = T>> Matrix<T> {
    /// Element-wise sign inversion.
    pub fn negate(&self) -> Matrix<T> {
        let elements = self
            .elements
            .iter()
            .map(|row| row.iter().map(|&x| -x).collect())
            .collect();
        Self::from_parts(self.shape(), elements)
    }

    /// `self - other`, defined as `self + (-other)`.
    pub fn minus(&self, other: &Matrix<T>) -> Result<Matrix<T>, Error> {
        self.add(&other.negate())
    }
}

impl<T> Matrix<T> {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.width, self.height)
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.elements.get(row)?.get(column)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.elements.iter().map(Vec::as_slice)
    }

    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.elements
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, column): (usize, usize)) -> &T {
        &self.elements[row][column]
    }
}

impl<T: Element + Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.negate()
    }
}

impl<T: Element + Neg<Output = T>> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.negate()
    }
}

/// Fails unless `lhs.width == rhs.height`.
pub(crate) fn ensure_multipliable<T>(lhs: &Matrix<T>, rhs: &Matrix<T>) -> Result<(), Error> {
    if lhs.width != rhs.height {
        return Err(Error::DimensionMismatch {
            this: lhs.shape(),
            other: rhs.shape(),
        });
    }
    Ok(())
}

/// Dot product of `lhs` row `row` with `rhs` column `column`.
pub(crate) fn dot<T>(lhs: &Matrix<T>, rhs: &Matrix<T>, row: usize, column: usize) -> T
where
    T: Element + Mul<Output = T>,
{
    lhs.elements[row]
        .iter()
        .zip(&rhs.elements)
        .fold(T::zero(), |sum, (&a, b_row)| sum + a * b_row[column])
}
