use log::debug;
use rand::{SeedableRng, rngs::StdRng};

use super::{ModelTrainer, Trainable};
use crate::{
    Result,
    arch::{
        Model, Sequential,
        activations::ActFn,
        layers::Layer,
        loss::{BinaryCrossEntropy, LossFn, Mse},
    },
    optimization::{Adam, GradientDescent, GradientDescentWithMomentum, Optimizer},
    specs::{ActFnSpec, LayerSpec, LossFnSpec, ModelSpec, OptimizerSpec, TrainerSpec},
};

/// Builds `Trainable`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Trainable` following a spec, with freshly initialized parameters.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    ///
    /// # Returns
    /// The boxed trainer or an error if the model can't be built or initialized.
    pub fn build(&self, spec: &TrainerSpec) -> Result<Box<dyn Trainable>> {
        self.resolve_model(spec)
    }

    fn resolve_model(&self, spec: &TrainerSpec) -> Result<Box<dyn Trainable>> {
        match &spec.model {
            ModelSpec::Sequential {
                layers: layer_specs,
            } => {
                let layers = layer_specs.iter().map(|ls| self.resolve_layer(*ls));
                let model = Sequential::new(layers)?;

                let mut rng = self.generate_rng(spec.seed);
                let params = model.init_params(&mut rng)?;
                debug!(
                    "built a sequential model with {} layers and {} parameters",
                    layer_specs.len(),
                    params.len()
                );

                self.resolve_optimizer(spec, model, params)
            }
        }
    }

    fn resolve_layer(&self, spec: LayerSpec) -> Layer {
        match spec {
            LayerSpec::Dense { dim, act_fn } => Layer::dense(dim, act_fn.map(Self::resolve_act_fn)),
        }
    }

    fn resolve_act_fn(spec: ActFnSpec) -> ActFn {
        match spec {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Relu => ActFn::relu(),
        }
    }

    fn resolve_optimizer<M>(
        &self,
        spec: &TrainerSpec,
        model: M,
        params: Vec<f32>,
    ) -> Result<Box<dyn Trainable>>
    where
        M: Model + 'static,
    {
        let len = params.len();

        match spec.optimizer {
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => {
                let optimizer = Adam::new(len, learning_rate, beta1, beta2, epsilon);
                self.resolve_loss(spec, model, params, optimizer)
            }
            OptimizerSpec::GradientDescent { learning_rate } => {
                let optimizer = GradientDescent::new(learning_rate);
                self.resolve_loss(spec, model, params, optimizer)
            }
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate,
                momentum,
            } => {
                let optimizer = GradientDescentWithMomentum::new(len, learning_rate, momentum);
                self.resolve_loss(spec, model, params, optimizer)
            }
        }
    }

    fn resolve_loss<M, O>(
        &self,
        spec: &TrainerSpec,
        model: M,
        params: Vec<f32>,
        optimizer: O,
    ) -> Result<Box<dyn Trainable>>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
    {
        match spec.loss {
            LossFnSpec::Mse => self.terminate_build(model, params, optimizer, Mse::new()),
            LossFnSpec::BinaryCrossEntropy => {
                self.terminate_build(model, params, optimizer, BinaryCrossEntropy::default())
            }
        }
    }

    fn terminate_build<M, O, L>(
        &self,
        model: M,
        params: Vec<f32>,
        optimizer: O,
        loss: L,
    ) -> Result<Box<dyn Trainable>>
    where
        M: Model + 'static,
        O: Optimizer + 'static,
        L: LossFn + 'static,
    {
        let trainer = ModelTrainer::new(model, params, optimizer, loss)?;
        Ok(Box::new(trainer))
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
