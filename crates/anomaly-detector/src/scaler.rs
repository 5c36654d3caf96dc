//! Column Standardization

use ndarray::Array2;

use crate::error::DetectorError;

/// Standard deviation below which a column is treated as constant
const MIN_STD: f64 = 1e-12;

/// Zero-mean, unit-variance scaler over matrix columns.
///
/// Uses population variance, matching the batch semantics of the scoring
/// stage: the fit data is the whole population for this run.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column statistics over a non-empty matrix.
    ///
    /// A column whose deviation is zero (or too small to divide by)
    /// cannot be standardized and is reported as `ZeroVariance`.
    pub fn fit(matrix: &Array2<f64>) -> Result<Self, DetectorError> {
        let rows = matrix.nrows() as f64;
        let mut means = Vec::with_capacity(matrix.ncols());
        let mut stds = Vec::with_capacity(matrix.ncols());
        for (column, col) in matrix.columns().into_iter().enumerate() {
            let mean = col.sum() / rows;
            let variance = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / rows;
            let std = variance.sqrt();
            if !std.is_finite() || std < MIN_STD {
                return Err(DetectorError::ZeroVariance { column });
            }
            means.push(mean);
            stds.push(std);
        }
        Ok(Self { means, stds })
    }

    /// Standardize a matrix with the fitted statistics.
    pub fn transform(&self, matrix: &Array2<f64>) -> Array2<f64> {
        let mut scaled = matrix.clone();
        for (column, mut col) in scaled.columns_mut().into_iter().enumerate() {
            let mean = self.means[column];
            let std = self.stds[column];
            col.mapv_inplace(|v| (v - mean) / std);
        }
        scaled
    }

    /// Fitted per-column means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Fitted per-column standard deviations.
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scaled_columns_have_zero_mean_unit_variance() {
        let matrix = array![[10.0], [12.0], [14.0], [16.0], [18.0]];
        let scaler = StandardScaler::fit(&matrix).unwrap();
        let scaled = scaler.transform(&matrix);

        let mean: f64 = scaled.column(0).sum() / 5.0;
        let variance: f64 = scaled.column(0).iter().map(|v| v * v).sum::<f64>() / 5.0;
        assert!(mean.abs() < 1e-9);
        assert!((variance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_columns_scaled_independently() {
        let matrix = array![[100.0, 1.0], [200.0, 3.0], [300.0, 5.0]];
        let scaler = StandardScaler::fit(&matrix).unwrap();
        assert!((scaler.means()[0] - 200.0).abs() < 1e-9);
        assert!((scaler.means()[1] - 3.0).abs() < 1e-9);

        let scaled = scaler.transform(&matrix);
        // Both columns land on the same standardized pattern
        for row in 0..3 {
            assert!((scaled[[row, 0]] - scaled[[row, 1]]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_column_rejected() {
        let matrix = array![[220.0, 1.0], [220.0, 2.0], [220.0, 3.0]];
        assert!(matches!(
            StandardScaler::fit(&matrix),
            Err(DetectorError::ZeroVariance { column: 0 })
        ));
    }
}
