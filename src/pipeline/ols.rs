//! Ordinary least squares via the normal equations

use faer::Mat;

use super::error::StatsError;

/// Fitted linear regression y = X·β + ε
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    pub nobs: usize,
    /// Diagonal of (X'X)^-1, used for standard errors
    inverse_gram_diag: Vec<f64>,
}

impl OlsFit {
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// Residual variance with n - k degrees of freedom.
    pub fn sigma2(&self) -> f64 {
        self.ssr / (self.nobs - self.n_params()) as f64
    }

    pub fn std_error(&self, index: usize) -> f64 {
        (self.sigma2() * self.inverse_gram_diag[index]).sqrt()
    }

    pub fn t_value(&self, index: usize) -> f64 {
        self.coefficients[index] / self.std_error(index)
    }

    /// Gaussian log-likelihood at the ML variance estimate ssr / n.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params() as f64
    }
}

/// Build an n×k design matrix from row-major data.
pub fn design_matrix(rows: &[Vec<f64>]) -> Mat<f64> {
    let n = rows.len();
    let k = rows.first().map_or(0, |r| r.len());
    let mut x = Mat::<f64>::zeros(n, k);
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    x
}

/// Fit y on the columns of x.
pub fn fit_ols(x: &Mat<f64>, y: &[f64], context: &'static str) -> Result<OlsFit, StatsError> {
    let n = x.nrows();
    let k = x.ncols();
    if n != y.len() || n <= k {
        return Err(StatsError::InsufficientData {
            procedure: context,
            required: k + 1,
            actual: n.min(y.len()),
        });
    }

    let mut y_mat = Mat::<f64>::zeros(n, 1);
    for (i, &v) in y.iter().enumerate() {
        y_mat[(i, 0)] = v;
    }

    let gram = x.transpose() * x;
    let xty = x.transpose() * &y_mat;

    let inverse = invert(&gram).ok_or(StatsError::SingularMatrix { context })?;

    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[(i, j)] * xty[(j, 0)]).sum())
        .collect();

    let residuals: Vec<f64> = (0..n)
        .map(|i| y[i] - (0..k).map(|j| x[(i, j)] * coefficients[j]).sum::<f64>())
        .collect();
    let ssr = residuals.iter().map(|r| r * r).sum();

    Ok(OlsFit {
        coefficients,
        residuals,
        ssr,
        nobs: n,
        inverse_gram_diag: (0..k).map(|i| inverse[(i, i)]).collect(),
    })
}

/// Gauss-Jordan inverse with partial pivoting. None when singular.
fn invert(a: &Mat<f64>) -> Option<Mat<f64>> {
    let n = a.nrows();
    let mut m = a.clone();
    let mut inv = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        inv[(i, i)] = 1.0;
    }

    let scale = (0..n)
        .map(|i| a[(i, i)].abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let tolerance = scale * 1e-12;

    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| {
            m[(r1, col)]
                .abs()
                .partial_cmp(&m[(r2, col)].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if !(m[(pivot, col)].abs() > tolerance) {
            return None;
        }
        if pivot != col {
            for j in 0..n {
                let tmp = m[(col, j)];
                m[(col, j)] = m[(pivot, j)];
                m[(pivot, j)] = tmp;
                let tmp = inv[(col, j)];
                inv[(col, j)] = inv[(pivot, j)];
                inv[(pivot, j)] = tmp;
            }
        }

        let p = m[(col, col)];
        for j in 0..n {
            m[(col, j)] /= p;
            inv[(col, j)] /= p;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[(row, j)] -= factor * m[(col, j)];
                inv[(row, j)] -= factor * inv[(col, j)];
            }
        }
    }

    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_linear_fit() {
        // y = 2 + 3x
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 2.0 + 3.0 * i as f64).collect();
        let fit = fit_ols(&design_matrix(&rows), &y, "test").unwrap();
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-9);
        assert!(fit.ssr < 1e-12);
    }

    #[test]
    fn test_collinear_columns_are_singular() {
        let rows: Vec<Vec<f64>> = (0..10)
            .map(|i| vec![i as f64, 2.0 * i as f64])
            .collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let result = fit_ols(&design_matrix(&rows), &y, "test");
        assert!(matches!(result, Err(StatsError::SingularMatrix { .. })));
    }

    #[test]
    fn test_too_few_rows() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        let result = fit_ols(&design_matrix(&rows), &[1.0, 2.0], "test");
        assert!(matches!(result, Err(StatsError::InsufficientData { .. })));
    }
}
