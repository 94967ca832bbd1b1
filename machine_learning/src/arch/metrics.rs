use ndarray::{ArrayView1, ArrayView2, Zip};

/// The fraction of samples whose highest scoring output differs from the target's.
#[derive(Default, Clone, Copy, Debug)]
pub struct ClassificationError;

impl ClassificationError {
    pub fn new() -> Self {
        Self
    }

    /// Returns a value in `[0, 1]`, `0` for an empty batch.
    pub fn error(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
        let rows = y_pred.nrows();

        if rows == 0 {
            return 0.;
        }

        let misses = Zip::from(y_pred.rows())
            .and(y.rows())
            .fold(0usize, |acc, p, t| acc + (argmax(p) != argmax(t)) as usize);

        misses as f32 / rows as f32
    }
}

/// Index of the first maximum, like most frameworks break ties.
fn argmax(row: ArrayView1<f32>) -> usize {
    row.indexed_iter()
        .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max { (i, v) } else { (best, max) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn counts_rows_with_different_argmax() {
        let y_pred = array![[0.1_f32, 0.9], [0.8, 0.2], [0.3, 0.7], [0.6, 0.4]];
        let y = array![[0.0_f32, 1.0], [0.0, 1.0], [0.0, 1.0], [1.0, 0.0]];

        assert_eq!(ClassificationError.error(y_pred.view(), y.view()), 0.25);
    }

    #[test]
    fn ties_resolve_to_the_first_index() {
        let y_pred = array![[0.5_f32, 0.5]];
        let y = array![[1.0_f32, 0.0]];

        assert_eq!(ClassificationError.error(y_pred.view(), y.view()), 0.0);
    }

    #[test]
    fn empty_batch_has_no_error() {
        let empty = ndarray::Array2::<f32>::zeros((0, 3));
        assert_eq!(ClassificationError.error(empty.view(), empty.view()), 0.0);
    }
}
