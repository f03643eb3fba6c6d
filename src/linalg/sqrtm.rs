use ndarray::{Array1, Array2};
use ndarray_linalg::{Eig, Eigh, Inverse, Norm, UPLO};
use num_complex::Complex64;

use crate::core::{Error, MatrixSqrt, Operand, Result};

/// Lift a real matrix into complex arithmetic
pub fn complexify(a: &Array2<f64>) -> Array2<Complex64> {
    a.mapv(|x| Complex64::new(x, 0.0))
}

/// Sum of the diagonal entries
pub fn trace(a: &Array2<Complex64>) -> Complex64 {
    a.diag().sum()
}

fn check_square(a: &Array2<f64>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            operand: Operand::SquareMatrix,
            expected: a.nrows(),
            got: a.ncols(),
        });
    }
    Ok(())
}

fn check_finite(s: &Array2<Complex64>, method: &str) -> Result<()> {
    if s.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(Error::NonConvergence(format!(
            "{} produced non-finite entries",
            method
        )));
    }
    Ok(())
}

fn check_tolerance(name: &str, value: f64) -> Result<()> {
    if !(value >= 0.0) {
        return Err(Error::InvalidParameter(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

fn invert(a: &Array2<Complex64>, what: &str) -> Result<Array2<Complex64>> {
    a.inv()
        .map_err(|err| Error::NonConvergence(format!("{} is singular: {:?}", what, err)))
}

/// Symmetric within `tol` relative to the largest entry
fn is_symmetric(a: &Array2<f64>, tol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    let scale = a
        .iter()
        .fold(0.0f64, |m, &v| m.max(v.abs()))
        .max(f64::MIN_POSITIVE);
    for i in 0..a.nrows() {
        for j in i + 1..a.ncols() {
            if (a[[i, j]] - a[[j, i]]).abs() > tol * scale {
                return false;
            }
        }
    }
    true
}

/// Eigen-decomposition of the symmetric part of `a`
///
/// Eigenvalues within d·ε·max(|λ|max, `scale`) of zero are set to exactly
/// zero, so the null space of a rank-deficient covariance does not leak √ε
/// noise. `scale` bounds the size of the factors `a` was computed from.
fn symmetric_eigen(a: &Array2<f64>, scale: f64) -> Result<(Array1<f64>, Array2<f64>)> {
    // Symmetrize to avoid numerical errors
    let sym = 0.5 * (a + &a.t());
    let (mut eigenvalues, eigenvectors) = sym
        .eigh(UPLO::Lower)
        .map_err(|err| Error::NonConvergence(format!("symmetric eigen-decomposition failed: {:?}", err)))?;

    let largest = eigenvalues.iter().fold(scale, |m, &v| m.max(v.abs()));
    let zero_tol = a.nrows() as f64 * f64::EPSILON * largest;
    eigenvalues.mapv_inplace(|lambda| if lambda.abs() <= zero_tol { 0.0 } else { lambda });

    Ok((eigenvalues, eigenvectors))
}

/// Convergence criteria for iterative square roots
#[derive(Debug, Clone)]
pub struct Convergence {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Relative tolerance on the iterate change: ||Y_k+1 - Y_k|| ≤ tol ||Y_k+1||
    pub tol: f64,
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tol: 1e-12,
        }
    }
}

impl Convergence {
    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        check_tolerance("convergence tolerance", self.tol)
    }
}

/// Square root through eigen-decomposition
///
/// Symmetric input uses the orthogonal decomposition A = Q Λ Qᵀ, so
/// S = Q Λ^{1/2} Qᵀ and rank-deficient covariances stay well conditioned.
/// Other input uses the general decomposition A = V Λ V⁻¹ with
/// S = V Λ^{1/2} V⁻¹. That route is only valid for diagonalizable A; defective
/// input shows up as a singular V or as a large residual ||S·S - A||.
///
/// The principal branch of the complex square root is taken on every
/// eigenvalue.
#[derive(Debug, Clone)]
pub struct EigenSqrt {
    /// Largest accepted ||S·S - A||_F / max(||A||_F, 1) on the general route
    pub residual_tol: f64,
    /// Largest accepted |a_ij - a_ji| relative to max |a_ij| for the symmetric route
    pub symmetry_tol: f64,
}

impl Default for EigenSqrt {
    fn default() -> Self {
        Self {
            residual_tol: 1e-6,
            symmetry_tol: 1e-10,
        }
    }
}

impl EigenSqrt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the residual tolerance of the general route
    pub fn with_residual_tol(mut self, residual_tol: f64) -> Result<Self> {
        check_tolerance("residual_tol", residual_tol)?;
        self.residual_tol = residual_tol;
        Ok(self)
    }

    /// Set the tolerance under which a matrix counts as symmetric
    pub fn with_symmetry_tol(mut self, symmetry_tol: f64) -> Result<Self> {
        check_tolerance("symmetry_tol", symmetry_tol)?;
        self.symmetry_tol = symmetry_tol;
        Ok(self)
    }

    fn symmetric_sqrtm(&self, a: &Array2<f64>) -> Result<Array2<Complex64>> {
        let (eigenvalues, eigenvectors) = symmetric_eigen(a, 0.0)?;
        let sqrt_eigenvalues = eigenvalues.mapv(|lambda| Complex64::new(lambda, 0.0).sqrt());
        let q = complexify(&eigenvectors);
        let s = (&q * &sqrt_eigenvalues).dot(&q.t());
        check_finite(&s, "symmetric eigen square root")?;
        tracing::debug!(dim = a.nrows(), "symmetric eigen square root");
        Ok(s)
    }

    fn general_sqrtm(&self, a: &Array2<f64>) -> Result<Array2<Complex64>> {
        let (eigenvalues, eigenvectors) = a
            .eig()
            .map_err(|err| Error::NonConvergence(format!("eigen-decomposition failed: {:?}", err)))?;
        let eigenvectors_inv = invert(&eigenvectors, "eigenvector matrix")?;

        // V · diag(√λ) scales column j of V by √λ_j
        let sqrt_eigenvalues: Array1<Complex64> = eigenvalues.mapv(|lambda| lambda.sqrt());
        let s = (&eigenvectors * &sqrt_eigenvalues).dot(&eigenvectors_inv);
        check_finite(&s, "eigen square root")?;

        let a_c = complexify(a);
        let residual = (&s.dot(&s) - &a_c).norm_l2() / a_c.norm_l2().max(1.0);
        tracing::debug!(dim = a.nrows(), residual, "eigen square root");

        if residual > self.residual_tol {
            return Err(Error::NonConvergence(format!(
                "eigen square root residual {:.3e} exceeds {:.3e} (matrix may be defective)",
                residual, self.residual_tol
            )));
        }

        Ok(s)
    }
}

impl MatrixSqrt for EigenSqrt {
    fn sqrtm(&self, a: &Array2<f64>) -> Result<Array2<Complex64>> {
        check_square(a)?;

        if is_symmetric(a, self.symmetry_tol) {
            self.symmetric_sqrtm(a)
        } else {
            self.general_sqrtm(a)
        }
    }

    /// tr (A·B)^{1/2} = tr (A^{1/2} B A^{1/2})^{1/2} for symmetric PSD A
    ///
    /// The inner matrix is symmetric, so only orthogonal decompositions are
    /// needed. Falls back to the product route when A is not symmetric PSD or
    /// B is not symmetric.
    fn trace_sqrtm_product(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<Complex64> {
        check_square(a)?;
        if b.dim() != a.dim() {
            let got = if b.nrows() != a.nrows() { b.nrows() } else { b.ncols() };
            return Err(Error::DimensionMismatch {
                operand: Operand::ProductFactor,
                expected: a.nrows(),
                got,
            });
        }

        if is_symmetric(a, self.symmetry_tol) && is_symmetric(b, self.symmetry_tol) {
            let (a_values, a_vectors) = symmetric_eigen(a, 0.0)?;
            if a_values.iter().all(|&lambda| lambda >= 0.0) {
                let a_half = (&a_vectors * &a_values.mapv(f64::sqrt)).dot(&a_vectors.t());
                let inner = a_half.dot(b).dot(&a_half);

                // Rounding in the null space of `inner` scales with ||A|| ||B||
                let a_norm = a_values.fold(0.0f64, |m, &lambda| m.max(lambda));
                let (inner_values, _) = symmetric_eigen(&inner, a_norm * b.norm_l2())?;
                let rank = inner_values.iter().filter(|&&lambda| lambda != 0.0).count();
                tracing::debug!(dim = a.nrows(), rank, "congruence trace square root");

                return Ok(inner_values
                    .iter()
                    .map(|&lambda| Complex64::new(lambda, 0.0).sqrt())
                    .sum());
            }
        }

        Ok(trace(&self.sqrtm(&a.dot(b))?))
    }
}

/// Denman–Beavers coupled Newton iteration
///
/// Y₀ = A, Z₀ = I
/// Y_{k+1} = (Y_k + Z_k⁻¹) / 2
/// Z_{k+1} = (Z_k + Y_k⁻¹) / 2
///
/// Y_k → A^{1/2} and Z_k → A^{-1/2} when A has no eigenvalues on the closed
/// negative real axis. Singular A, including the product of rank-deficient
/// covariances, is reported as non-convergence.
#[derive(Debug, Clone, Default)]
pub struct DenmanBeavers {
    pub convergence: Convergence,
}

impl DenmanBeavers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Result<Self> {
        convergence.validate()?;
        self.convergence = convergence;
        Ok(self)
    }
}

impl MatrixSqrt for DenmanBeavers {
    fn sqrtm(&self, a: &Array2<f64>) -> Result<Array2<Complex64>> {
        check_square(a)?;

        let mut y = complexify(a);
        let mut z: Array2<Complex64> = Array2::eye(a.nrows());

        for iter in 0..self.convergence.max_iterations {
            let y_inv = invert(&y, "Denman-Beavers iterate Y")?;
            let z_inv = invert(&z, "Denman-Beavers iterate Z")?;

            let y_next = (&y + &z_inv).mapv(|v| v * 0.5);
            let z_next = (&z + &y_inv).mapv(|v| v * 0.5);

            let change = (&y_next - &y).norm_l2();
            let size = y_next.norm_l2();
            tracing::trace!(iter, change, size, "Denman-Beavers step");

            y = y_next;
            z = z_next;
            check_finite(&y, "Denman-Beavers iteration")?;

            if change <= self.convergence.tol * size {
                tracing::debug!(dim = a.nrows(), iterations = iter + 1, "Denman-Beavers converged");
                return Ok(y);
            }
        }

        Err(Error::NonConvergence(format!(
            "Denman-Beavers iteration did not converge in {} iterations",
            self.convergence.max_iterations
        )))
    }
}
