use std::ops::{Add, Sub, Mul, Index, IndexMut};

use super::Vector3D;

/// A 3x3 square matrix type, stored in row-major order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3([[f64; 3]; 3]);

impl Matrix3 {
    /// Create a new `Matrix3` from its rows
    pub fn new(data: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(data)
    }

    /// Create a new `Matrix3` with all components set to zero
    pub fn zero() -> Matrix3 {
        Matrix3([[0.0; 3]; 3])
    }

    /// Create the identity matrix
    pub fn one() -> Matrix3 {
        Matrix3([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Compute the determinant of this matrix
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2]) -
        m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
        m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Compute the inverse of this matrix. The matrix must be invertible,
    /// callers are expected to check the determinant first.
    pub fn inverse(&self) -> Matrix3 {
        let determinant = self.determinant();
        assert!(determinant != 0.0, "this matrix is not invertible");

        let m = &self.0;
        let inv_det = 1.0 / determinant;
        Matrix3([
            [
                (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv_det,
                (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv_det,
            ],
        ])
    }

    /// Get the transposed of this matrix
    pub fn transposed(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Are all the components of this matrix finite?
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(data: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(data)
    }
}

impl Index<usize> for Matrix3 {
    type Output = [f64; 3];
    #[inline]
    fn index(&self, index: usize) -> &[f64; 3] {
        &self.0[index]
    }
}

impl IndexMut<usize> for Matrix3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut [f64; 3] {
        &mut self.0[index]
    }
}

impl_arithmetic!(
    Matrix3, Matrix3, Add, add, Matrix3,
    self, other,
    {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result[i][j] = self[i][j] + other[i][j];
            }
        }
        result
    }
);

impl_arithmetic!(
    Matrix3, Matrix3, Sub, sub, Matrix3,
    self, other,
    {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result[i][j] = self[i][j] - other[i][j];
            }
        }
        result
    }
);

impl_arithmetic!(
    Matrix3, Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result[i][j] += self[i][k] * other[k][j];
                }
            }
        }
        result
    }
);

impl_arithmetic!(
    Matrix3, Vector3D, Mul, mul, Vector3D,
    self, vector,
    Vector3D::new(
        self[0][0] * vector[0] + self[0][1] * vector[1] + self[0][2] * vector[2],
        self[1][0] * vector[0] + self[1][1] * vector[1] + self[1][2] * vector[2],
        self[2][0] * vector[0] + self[2][1] * vector[1] + self[2][2] * vector[2],
    )
);

lsh_scal_arithmetic!(
    Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result[i][j] = self[i][j] * other;
            }
        }
        result
    }
);
