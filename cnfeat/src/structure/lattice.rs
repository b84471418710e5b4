//! The `Lattice` type represents the periodic repeat unit of a crystal
//! structure, defined by three basis vectors.
use crate::{Error, Matrix3, Vector3D};

/// Relative tolerance on the determinant of the lattice matrix. A lattice
/// with `|det(H)| <= DEGENERACY_TOLERANCE * |a| |b| |c|` (i.e. with basis
/// vectors spanning a nearly flat volume) is rejected.
const DEGENERACY_TOLERANCE: f64 = 1e-6;

/// A `Lattice` defines the periodic boundaries of a crystal structure.
///
/// The lattice matrix stores the basis vectors `a`, `b`, `c` as rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    /// Lattice matrix, basis vectors as rows
    matrix: Matrix3,
    /// Transpose of the lattice matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the lattice matrix, cached from matrix
    inverse: Matrix3,
}

impl Lattice {
    /// Create a new lattice from the given matrix, containing the basis
    /// vectors as rows.
    ///
    /// This fails with `Error::InvalidStructure` if the matrix contains
    /// non-finite values or if the basis vectors are (nearly) linearly
    /// dependent.
    pub fn new(matrix: Matrix3) -> Result<Lattice, Error> {
        if !matrix.is_finite() {
            return Err(Error::InvalidStructure(format!(
                "lattice matrix contains non-finite values: {:?}", matrix
            )));
        }

        let lengths = Vector3D::from(matrix[0]).norm()
            * Vector3D::from(matrix[1]).norm()
            * Vector3D::from(matrix[2]).norm();

        let determinant = matrix.determinant();
        if lengths == 0.0 || f64::abs(determinant) <= DEGENERACY_TOLERANCE * lengths {
            return Err(Error::InvalidStructure(format!(
                "lattice matrix is degenerate (determinant = {:e})", determinant
            )));
        }

        return Ok(Lattice {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
        });
    }

    /// Create an orthorhombic lattice, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<Lattice, Error> {
        if !(a > 0.0 && b > 0.0 && c > 0.0) {
            return Err(Error::InvalidStructure(format!(
                "lattice lengths must be positive, got {}, {}, {}", a, b, c
            )));
        }

        return Lattice::new(Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]));
    }

    /// Create a cubic lattice, with side lengths `length, length, length`.
    pub fn cubic(length: f64) -> Result<Lattice, Error> {
        Lattice::orthorhombic(length, length, length)
    }

    /// Create a lattice from the usual crystallographic parameters: side
    /// lengths `a, b, c` and angles `alpha, beta, gamma` in degrees.
    ///
    /// The first vector is aligned with the x axis and the second one is in
    /// the xy plane.
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Lattice, Error> {
        if !(a > 0.0 && b > 0.0 && c > 0.0) {
            return Err(Error::InvalidStructure(format!(
                "lattice lengths must be positive, got {}, {}, {}", a, b, c
            )));
        }

        for angle in [alpha, beta, gamma] {
            if !(angle > 0.0 && angle < 180.0) {
                return Err(Error::InvalidStructure(format!(
                    "lattice angles must be between 0 and 180 degrees, got {}", angle
                )));
            }
        }

        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z2 = c * c - c_y * c_y - c_x * c_x;
        if c_z2 <= 0.0 {
            return Err(Error::InvalidStructure(format!(
                "lattice angles {}, {}, {} do not describe a valid cell", alpha, beta, gamma
            )));
        }

        return Lattice::new(Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, f64::sqrt(c_z2)],
        ]));
    }

    /// Get the length of the first basis vector
    pub fn a(&self) -> f64 {
        self.a_vector().norm()
    }

    /// Get the length of the second basis vector
    pub fn b(&self) -> f64 {
        self.b_vector().norm()
    }

    /// Get the length of the third basis vector
    pub fn c(&self) -> f64 {
        self.c_vector().norm()
    }

    /// Get the angle between `b` and `c`, in degrees
    pub fn alpha(&self) -> f64 {
        angle(self.b_vector(), self.c_vector()).to_degrees()
    }

    /// Get the angle between `a` and `c`, in degrees
    pub fn beta(&self) -> f64 {
        angle(self.a_vector(), self.c_vector()).to_degrees()
    }

    /// Get the angle between `a` and `b`, in degrees
    pub fn gamma(&self) -> f64 {
        angle(self.a_vector(), self.b_vector()).to_degrees()
    }

    /// Get the volume of the lattice cell
    pub fn volume(&self) -> f64 {
        // The volume is the mixed product of the three basis vectors
        f64::abs(self.a_vector() * (self.b_vector() ^ self.c_vector()))
    }

    /// Get the matrix representation of the lattice
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the distances between opposite faces of the cell, i.e. the
    /// spacing between consecutive lattice planes along each basis vector.
    pub fn distances_between_faces(&self) -> Vector3D {
        let (a, b, c) = (self.a_vector(), self.b_vector(), self.c_vector());
        // Plans normal vectors
        let na = (b ^ c).normalized();
        let nb = (c ^ a).normalized();
        let nc = (a ^ b).normalized();

        Vector3D::new(f64::abs(na * a), f64::abs(nb * b), f64::abs(nc * c))
    }

    /// Get the fractional representation of the Cartesian `vector`
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        // this needs to use the inverse of the transpose of the matrix, since
        // we only have code to multiply a vector by a matrix on the left
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.transpose * fractional;
    }

    /// Get the first basis vector
    pub fn a_vector(&self) -> Vector3D {
        self.matrix[0].into()
    }

    /// Get the second basis vector
    pub fn b_vector(&self) -> Vector3D {
        self.matrix[1].into()
    }

    /// Get the third basis vector
    pub fn c_vector(&self) -> Vector3D {
        self.matrix[2].into()
    }
}

/// Get the angles between the vectors `u` and `v`.
fn angle(u: Vector3D, v: Vector3D) -> f64 {
    let un = u.normalized();
    let vn = v.normalized();
    f64::acos(f64::clamp(un * vn, -1.0, 1.0))
}
