//! Dense unitary matrices.
//!
//! Gates, gauges and whole circuits are compared through their matrices.
//! Matrices are square, row-major, of dimension `2^n`. For an `n`-qubit
//! gate the first operand is the most significant bit of the row index,
//! so `a.kron(&b)` acts with `a` on the first operand and `b` on the second.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{IrError, IrResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A dense square complex matrix in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    dim: usize,
    data: Vec<Complex64>,
}

impl Unitary {
    /// Create the identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self { dim, data }
    }

    /// Build a matrix from row-major entries.
    ///
    /// The number of entries must be `4^n` for some `n`.
    pub fn from_row_major(data: Vec<Complex64>) -> IrResult<Self> {
        let dim = (data.len() as f64).sqrt().round() as usize;
        if dim == 0 || dim * dim != data.len() || !dim.is_power_of_two() {
            return Err(IrError::MatrixShape {
                gate_name: "matrix".into(),
                expected: dim.next_power_of_two().pow(2).max(1),
                got: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    /// Create a diagonal matrix.
    pub fn diagonal(entries: &[Complex64]) -> Self {
        let dim = entries.len();
        let mut data = vec![ZERO; dim * dim];
        for (i, &e) in entries.iter().enumerate() {
            data[i * dim + i] = e;
        }
        Self { dim, data }
    }

    /// Create a matrix with one non-zero entry per row: row `r` holds
    /// `value` in column `col` for `entries[r] = (col, value)`.
    pub(crate) fn monomial(entries: &[(usize, Complex64)]) -> Self {
        let dim = entries.len();
        let mut data = vec![ZERO; dim * dim];
        for (r, &(c, value)) in entries.iter().enumerate() {
            data[r * dim + c] = value;
        }
        Self { dim, data }
    }

    /// Wrap row-major entries already known to be `dim x dim`.
    pub(crate) fn from_parts(dim: usize, data: Vec<Complex64>) -> Self {
        debug_assert_eq!(data.len(), dim * dim);
        Self { dim, data }
    }

    /// Create a 2x2 matrix `[[a, b], [c, d]]`.
    pub fn single(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self {
            dim: 2,
            data: vec![a, b, c, d],
        }
    }

    /// Controlled version of a single-qubit matrix; the control is the first operand.
    pub fn controlled(target: &Unitary) -> Self {
        debug_assert_eq!(target.dim, 2);
        let mut out = Self::identity(4);
        for r in 0..2 {
            for c in 0..2 {
                out.data[(2 + r) * 4 + 2 + c] = target.get(r, c);
            }
        }
        out
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits this matrix acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.dim.trailing_zeros()
    }

    /// Row-major entries.
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Entry at row `r`, column `c`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Complex64 {
        self.data[r * self.dim + c]
    }

    /// Overwrite column `c`.
    pub(crate) fn set_column(&mut self, c: usize, column: &[Complex64]) {
        for (r, &v) in column.iter().enumerate() {
            self.data[r * self.dim + c] = v;
        }
    }

    // =========================================================================
    // Single-qubit constructors
    // =========================================================================

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        Self::single(s, s, s, -s)
    }

    /// Pauli-X.
    pub fn x() -> Self {
        Self::single(ZERO, ONE, ONE, ZERO)
    }

    /// Pauli-Y.
    pub fn y() -> Self {
        Self::single(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Pauli-Z.
    pub fn z() -> Self {
        Self::single(ONE, ZERO, ZERO, -ONE)
    }

    /// Phase gate P(lambda) = diag(1, e^{i lambda}).
    pub fn p(lambda: f64) -> Self {
        Self::single(ONE, ZERO, ZERO, Complex64::from_polar(1.0, lambda))
    }

    /// S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    /// S-dagger gate.
    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    /// T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::single(half + half_i, half - half_i, half - half_i, half + half_i)
    }

    /// SX-dagger gate.
    pub fn sxdg() -> Self {
        Self::sx().dagger()
    }

    /// RX rotation.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::single(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// RY rotation.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::single(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// RZ rotation.
    pub fn rz(theta: f64) -> Self {
        Self::single(
            Complex64::from_polar(1.0, -theta / 2.0),
            ZERO,
            ZERO,
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Universal single-qubit gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::single(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    // =========================================================================
    // Algebra
    // =========================================================================

    /// Matrix product `self * other`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim, "dimension mismatch in matrix product");
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for k in 0..n {
                let a = self.data[r * n + k];
                if a == ZERO {
                    continue;
                }
                for c in 0..n {
                    data[r * n + c] += a * other.data[k * n + c];
                }
            }
        }
        Self { dim: n, data }
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Self {
        let (n, m) = (self.dim, other.dim);
        let dim = n * m;
        let mut data = vec![ZERO; dim * dim];
        for r1 in 0..n {
            for c1 in 0..n {
                let a = self.data[r1 * n + c1];
                for r2 in 0..m {
                    for c2 in 0..m {
                        data[(r1 * m + r2) * dim + c1 * m + c2] = a * other.data[r2 * m + c2];
                    }
                }
            }
        }
        Self { dim, data }
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for c in 0..n {
                data[c * n + r] = self.data[r * n + c].conj();
            }
        }
        Self { dim: n, data }
    }

    /// Multiply every entry by `factor`.
    #[must_use]
    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            dim: self.dim,
            data: self.data.iter().map(|&v| v * factor).collect(),
        }
    }

    /// Largest entry-wise distance to `other`.
    pub fn max_deviation(&self, other: &Self) -> f64 {
        if self.dim != other.dim {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Check `U · U† = I` within `tol`.
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.mul(&self.dagger())
            .max_deviation(&Self::identity(self.dim))
            <= tol
    }

    /// Global phase `φ` with `other ≈ φ · self`, if one exists within `tol`.
    ///
    /// The phase is read off the largest-magnitude entry of `self` and then
    /// every entry is checked, so matrices that differ only by a scalar of
    /// modulus one are accepted and anything else is rejected.
    pub fn phase_to(&self, other: &Self, tol: f64) -> Option<Complex64> {
        let (phase, deviation) = self.phase_aligned_deviation(other)?;
        (deviation <= tol).then_some(phase)
    }

    /// Check `self ≈ φ · other` for some `|φ| = 1`.
    pub fn equal_up_to_global_phase(&self, other: &Self, tol: f64) -> bool {
        self.phase_to(other, tol).is_some()
    }

    /// Largest entry-wise distance after removing the best global phase.
    ///
    /// Returns `f64::INFINITY` when the dimensions differ or `self` is zero.
    pub fn deviation_up_to_global_phase(&self, other: &Self) -> f64 {
        self.phase_aligned_deviation(other)
            .map_or(f64::INFINITY, |(_, d)| d)
    }

    fn phase_aligned_deviation(&self, other: &Self) -> Option<(Complex64, f64)> {
        if self.dim != other.dim {
            return None;
        }
        let (pivot, pivot_val) = self
            .data
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))?;
        if pivot_val.norm() < f64::EPSILON {
            return None;
        }
        let ratio = other.data[pivot] / pivot_val;
        let phase = if ratio.norm() < f64::EPSILON {
            ONE
        } else {
            ratio / ratio.norm()
        };
        let deviation = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a * phase - b).norm())
            .fold(0.0, f64::max);
        Some((phase, deviation))
    }

    /// Check whether `self · other ≈ other · self`.
    pub fn commutes_with(&self, other: &Self, tol: f64) -> bool {
        self.dim == other.dim && self.mul(other).max_deviation(&other.mul(self)) <= tol
    }
}

impl std::ops::Mul for &Unitary {
    type Output = Unitary;

    fn mul(self, rhs: Self) -> Unitary {
        Unitary::mul(self, rhs)
    }
}

impl std::ops::Mul for Unitary {
    type Output = Unitary;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Unitary {
        Unitary::mul(&self, &rhs)
    }
}
