use ndarray::{Array2, ArrayView2, Axis};

use crate::{Result, SessionErr};

/// Features and labels of `N` samples, one sample per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Array2<f32>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `features` - An `N x D` array of features.
    /// * `labels` - An `N x C` array of labels.
    ///
    /// # Returns
    /// A new `Dataset` or `SessionErr::DatasetShapeMismatch` if the row counts differ.
    pub fn new(features: Array2<f32>, labels: Array2<f32>) -> Result<Self> {
        if features.nrows() != labels.nrows() {
            return Err(SessionErr::DatasetShapeMismatch {
                features: features.nrows(),
                labels: labels.nrows(),
            });
        }

        Ok(Self { features, labels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    #[inline]
    pub fn labels(&self) -> ArrayView2<'_, f32> {
        self.labels.view()
    }

    /// Divides every feature by `scale`, mapping raw pixels into `[0, 1]` for `scale = 255`.
    pub fn normalize(&mut self, scale: f32) {
        self.features.mapv_inplace(|x| x / scale);
    }

    /// Copies the rows at `indices` into a new `Batch`.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Batch {
        Batch {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}

/// An owned mini-batch, materialized fresh on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub features: Array2<f32>,
    pub labels: Array2<f32>,
}

impl Batch {
    #[inline]
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
