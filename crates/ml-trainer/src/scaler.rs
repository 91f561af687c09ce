use ndarray::{Array1, Array2, Axis};

/// Column-wise standardisation to zero mean and unit variance.
#[derive(Debug, Clone, Default)]
pub struct FeatureScaler {
    means: Array1<f64>,
    stds: Array1<f64>,
}

impl FeatureScaler {
    /// Learns per-column means and sample standard deviations.
    ///
    /// Constant columns get a standard deviation of 1 so they pass through centred.
    pub fn fit(data: &Array2<f64>) -> Self {
        let n_samples = data.nrows();
        let means = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(data.ncols()));
        let ddof = if n_samples > 1 { 1.0 } else { 0.0 };
        let stds = data
            .std_axis(Axis(0), ddof)
            .mapv(|s| if s < 1e-10 || !s.is_finite() { 1.0 } else { s });
        Self { means, stds }
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        (data - &self.means) / &self.stds
    }
}
