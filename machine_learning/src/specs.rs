//! Serializable descriptions of the pieces a trainer is assembled from.

use serde::{Deserialize, Serialize};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Relu,
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        dim: (usize, usize),
        act_fn: Option<ActFnSpec>,
    },
}

impl LayerSpec {
    /// The `(in, out)` dimensions of the layer.
    pub fn dim(&self) -> (usize, usize) {
        match *self {
            LayerSpec::Dense { dim, .. } => dim,
        }
    }
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

impl ModelSpec {
    /// The fully connected autoencoder for 28x28 images: 784-64-32-32-64-784, ReLU on every
    /// hidden layer and a sigmoid on the reconstruction.
    pub fn autoencoder() -> Self {
        let relu = Some(ActFnSpec::Relu);
        let dense = |dim, act_fn| LayerSpec::Dense { dim, act_fn };

        ModelSpec::Sequential {
            layers: vec![
                dense((784, 64), relu),
                dense((64, 32), relu),
                dense((32, 32), relu),
                dense((32, 64), relu),
                dense((64, 784), Some(ActFnSpec::Sigmoid { amp: 1. })),
            ],
        }
    }

    /// The input and output widths of the model, `None` if it has no layers.
    pub fn io_dims(&self) -> Option<(usize, usize)> {
        match self {
            ModelSpec::Sequential { layers } => {
                let first = layers.first()?.dim();
                let last = layers.last()?.dim();
                Some((first.0, last.1))
            }
        }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::autoencoder()
    }
}

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
    GradientDescentWithMomentum {
        learning_rate: f32,
        momentum: f32,
    },
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        OptimizerSpec::Adam {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    Mse,
    #[default]
    BinaryCrossEntropy,
}

/// The specification for a `Trainable`: what to train, how to update it and what to minimize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    pub optimizer: OptimizerSpec,
    pub loss: LossFnSpec,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoencoder_maps_images_back_to_images() {
        assert_eq!(ModelSpec::autoencoder().io_dims(), Some((784, 784)));
    }

    #[test]
    fn specs_deserialize_from_snake_case_json() {
        let json = r#"{
            "sequential": {
                "layers": [
                    { "dense": { "dim": [4, 2], "act_fn": "relu" } },
                    { "dense": { "dim": [2, 4], "act_fn": { "sigmoid": { "amp": 1.0 } } } }
                ]
            }
        }"#;

        let spec: ModelSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.io_dims(), Some((4, 4)));

        let optimizer: OptimizerSpec =
            serde_json::from_str(r#"{ "gradient_descent": { "learning_rate": 0.5 } }"#).unwrap();
        assert_eq!(
            optimizer,
            OptimizerSpec::GradientDescent { learning_rate: 0.5 }
        );

        let loss: LossFnSpec = serde_json::from_str(r#""binary_cross_entropy""#).unwrap();
        assert_eq!(loss, LossFnSpec::BinaryCrossEntropy);
    }

    #[test]
    fn missing_trainer_fields_fall_back_to_defaults() {
        let spec: TrainerSpec = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();

        assert_eq!(spec.seed, Some(7));
        assert_eq!(spec.model, ModelSpec::autoencoder());
        assert_eq!(spec.loss, LossFnSpec::BinaryCrossEntropy);
    }

    #[test]
    fn empty_model_has_no_dims() {
        let spec = ModelSpec::Sequential { layers: vec![] };
        assert_eq!(spec.io_dims(), None);
    }
}
