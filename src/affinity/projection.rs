//! Low-rank projection of weighted documents.
//!
//! Sparse tf-idf rows are noisy: two profiles that use synonyms share no
//! terms at all. Projecting onto the top principal axes of the joint
//! corpus lets related vocabulary reinforce itself.
//!
//! # Algorithm
//!
//! For `n` documents and `V` terms the decomposition works on the `n × n`
//! Gram matrix `G = X·Xᵀ` instead of the `V × V` covariance, since
//! `n ≪ V` for profile corpora.
//!
//! 1. `Pca` centers every term column first; `Svd` uses `X` as is.
//! 2. Find the top eigenpairs `(λⱼ, uⱼ)` of `G` by power iteration, each
//!    iterate re-orthogonalized against the eigenvectors already found.
//! 3. Stop early when `λⱼ` is negligible relative to `λ₁`: the corpus has
//!    lower rank than requested and the projection simply has fewer axes.
//! 4. Document scores are `zᵢⱼ = uⱼ[i] · √λⱼ` (the rows of `U·Σ`).
//!
//! # Reference
//! Golub & Van Loan (2013), "Matrix Computations", Ch. 8.2 (Power method)

use serde::{Deserialize, Serialize};

/// Dimensionality reduction applied before comparing profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Principal components of the mean-centered corpus.
    Pca,
    /// Truncated singular value decomposition (no centering).
    Svd,
    /// Compare weighted term vectors directly.
    None,
}

const MAX_ITERATIONS: usize = 500;
const CONVERGENCE_TOL: f64 = 1e-10;
const RELATIVE_RANK_TOL: f64 = 1e-9;

/// Projects `rows` onto at most `dims` axes.
///
/// The returned rows all have the same length, which may be smaller than
/// `dims` (down to zero) when the corpus has lower rank.
pub(crate) fn project(rows: &[Vec<f64>], dims: usize, center: bool) -> Vec<Vec<f64>> {
    let n = rows.len();
    if n == 0 || dims == 0 {
        return vec![Vec::new(); n];
    }

    let data = if center { centered(rows) } else { rows.to_vec() };
    let gram = gram_matrix(&data);

    let mut axes: Vec<Vec<f64>> = Vec::new();
    let mut scales: Vec<f64> = Vec::new();
    let mut top_eigenvalue = 0.0_f64;

    for k in 0..dims.min(n) {
        let Some((lambda, vector)) = dominant_eigenpair(&gram, &axes, k) else {
            break;
        };
        if k == 0 {
            top_eigenvalue = lambda;
        }
        if lambda <= CONVERGENCE_TOL || lambda <= RELATIVE_RANK_TOL * top_eigenvalue {
            break;
        }
        scales.push(lambda.sqrt());
        axes.push(vector);
    }

    tracing::debug!(
        requested = dims,
        effective = axes.len(),
        centered = center,
        "projection fitted"
    );

    (0..n)
        .map(|i| {
            axes.iter()
                .zip(&scales)
                .map(|(u, s)| u[i] * s)
                .collect()
        })
        .collect()
}

fn centered(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = rows.len() as f64;
    let width = rows.first().map_or(0, Vec::len);
    let mut means = vec![0.0; width];
    for row in rows {
        for (m, v) in means.iter_mut().zip(row) {
            *m += v;
        }
    }
    for m in &mut means {
        *m /= n;
    }
    rows.iter()
        .map(|row| row.iter().zip(&means).map(|(v, m)| v - m).collect())
        .collect()
}

fn gram_matrix(data: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut gram = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot = dot(&data[i], &data[j]);
            gram[i][j] = dot;
            gram[j][i] = dot;
        }
    }
    gram
}

fn dominant_eigenpair(
    gram: &[Vec<f64>],
    found: &[Vec<f64>],
    seed: usize,
) -> Option<(f64, Vec<f64>)> {
    let n = gram.len();
    // Deterministic start vector with no special structure.
    let mut v: Vec<f64> = (0..n)
        .map(|i| 1.0 + ((i + seed + 1) as f64 * 0.618_033_988_75).fract())
        .collect();
    orthogonalize(&mut v, found);
    if !normalize(&mut v) {
        return None;
    }

    let mut lambda = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let mut next = mat_vec(gram, &v);
        orthogonalize(&mut next, found);
        lambda = dot(&v, &next);
        if !normalize(&mut next) {
            return Some((0.0, v));
        }
        let delta: f64 = next
            .iter()
            .zip(&v)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        v = next;
        if delta < CONVERGENCE_TOL {
            break;
        }
    }
    Some((lambda.max(0.0), v))
}

fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
    for b in basis {
        let proj = dot(v, b);
        for (x, y) in v.iter_mut().zip(b) {
            *x -= proj * y;
        }
    }
}

fn normalize(v: &mut [f64]) -> bool {
    let norm = dot(v, v).sqrt();
    if norm <= f64::EPSILON {
        return false;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    true
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter().map(|row| dot(row, v)).collect()
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_limits_dimensions() {
        // Three distinct points: centered rank is 2.
        let rows = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0],
        ];
        let z = project(&rows, 10, true);
        assert_eq!(z.len(), 4);
        assert_eq!(z[0].len(), 2);
        // Identical inputs project identically.
        for (a, b) in z[0].iter().zip(&z[3]) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_rows_collapse_to_zero_dims() {
        let rows = vec![vec![0.5, 0.5]; 3];
        let z = project(&rows, 4, true);
        assert!(z.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_svd_keeps_uncentered_axis() {
        let rows = vec![vec![0.5, 0.5]; 3];
        let z = project(&rows, 4, false);
        assert_eq!(z[0].len(), 1);
    }

    #[test]
    fn test_projection_preserves_distances() {
        // Full-rank projection of centered data is an isometry.
        let rows = vec![vec![3.0, 0.0], vec![0.0, 4.0], vec![0.0, 0.0]];
        let z = project(&rows, 2, true);
        let d = |a: &[f64], b: &[f64]| -> f64 {
            a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
        };
        assert!((d(&z[0], &z[1]) - 5.0).abs() < 1e-6);
        assert!((d(&z[0], &z[2]) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let rows = vec![vec![1.0, 2.0, 0.0], vec![0.0, 1.0, 3.0], vec![2.0, 0.0, 1.0]];
        assert_eq!(project(&rows, 2, true), project(&rows, 2, true));
    }
}
