use ndarray::Array2;

/// One-hot encodes integer labels, with one category per distinct label seen by `fit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneHotEncoder {
    categories: Vec<u8>,
}

impl OneHotEncoder {
    /// Learns the categories from `labels`: their distinct values, sorted.
    pub fn fit(labels: &[u8]) -> Self {
        let mut categories = labels.to_vec();
        categories.sort_unstable();
        categories.dedup();
        Self { categories }
    }

    pub fn categories(&self) -> &[u8] {
        &self.categories
    }

    /// Encodes `labels` as an `N x C` array with a single 1 per row.
    ///
    /// Labels outside the fitted categories are encoded as all-zero rows.
    pub fn transform(&self, labels: &[u8]) -> Array2<f32> {
        let mut encoded = Array2::zeros((labels.len(), self.categories.len()));

        for (mut row, label) in encoded.rows_mut().into_iter().zip(labels) {
            if let Ok(col) = self.categories.binary_search(label) {
                row[col] = 1.;
            }
        }

        encoded
    }

    pub fn fit_transform(labels: &[u8]) -> (Self, Array2<f32>) {
        let encoder = Self::fit(labels);
        let encoded = encoder.transform(labels);
        (encoder, encoded)
    }
}
