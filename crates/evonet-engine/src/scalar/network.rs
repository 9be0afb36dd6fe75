use rand::Rng;

use crate::{Activation, Layer, NetworkError, brain};

/// Feedforward network in per-neuron form.
///
/// The network has `hidden_layer_count` hidden layers followed by one output
/// layer. Every hidden layer is `input_count` nodes wide and every node in every
/// layer takes `input_count` inputs, so the hidden width always equals the input
/// width.
///
/// The network also carries a default [`Activation`] (logistic unless changed
/// with [`Self::with_activation`]) used when it is driven through the
/// [`Brain`](crate::Brain) trait. It does not take part in equality.
#[derive(Debug, Clone)]
pub struct Network {
    input_count: usize,
    output_count: usize,
    layers: Vec<Layer>,
    activation: Activation,
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.input_count == other.input_count
            && self.output_count == other.output_count
            && self.layers == other.layers
    }
}

impl Network {
    /// Creates a zeroed network.
    ///
    /// Fails with [`NetworkError::NoOutputs`] if `output_count` is zero. Call
    /// [`Self::randomize`] before use.
    pub fn new(
        input_count: usize,
        output_count: usize,
        hidden_layer_count: usize,
    ) -> Result<Self, NetworkError> {
        if output_count < 1 {
            return Err(NetworkError::NoOutputs);
        }
        let layers = (0..=hidden_layer_count)
            .map(|i| {
                let width = if i == hidden_layer_count {
                    output_count
                } else {
                    input_count
                };
                Layer::new(width, input_count)
            })
            .collect();
        Ok(Self {
            input_count,
            output_count,
            layers,
            activation: Activation::Sigmoid,
        })
    }

    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    #[must_use]
    pub fn hidden_layer_count(&self) -> usize {
        self.layers.len() - 1
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for layer in &mut self.layers {
            layer.randomize(rng);
        }
    }

    pub fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for layer in &mut self.layers {
            layer.mutate(chance, amount, rng);
        }
    }

    /// Feeds `inputs` through every layer, applying `activation` after each one.
    ///
    /// Returns `output_count` values.
    pub fn evaluate(&self, inputs: &[f64], activation: Activation) -> Result<Vec<f64>, NetworkError> {
        self.check_inputs(inputs)?;
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.evaluate(&values, activation)?;
        }
        Ok(values)
    }

    /// Feeds `inputs` through every layer without any activation.
    ///
    /// Always equal to `evaluate(inputs, Activation::Identity)`.
    pub fn evaluate_linear(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_inputs(inputs)?;
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.evaluate_linear(&values)?;
        }
        Ok(values)
    }

    /// Evaluates and returns the index of the largest strictly positive output.
    ///
    /// See [`best_index`](crate::best_index) for the selection rule.
    pub fn best_index(
        &self,
        inputs: &[f64],
        activation: Activation,
    ) -> Result<Option<usize>, NetworkError> {
        Ok(brain::best_index(&self.evaluate(inputs, activation)?))
    }

    /// Replaces every layer with a copy of `layers`.
    ///
    /// Fails, leaving `self` untouched, unless `layers` has the same number of
    /// layers as `self` and each layer has the same node count and input width.
    pub fn copy_from(&mut self, layers: &[Layer]) -> Result<(), NetworkError> {
        if layers.len() != self.layers.len() {
            return Err(NetworkError::LayerCount {
                expected: self.layers.len(),
                actual: layers.len(),
            });
        }
        for (i, (ours, theirs)) in self.layers.iter().zip(layers).enumerate() {
            let expected = (ours.node_count(), ours.input_count());
            let actual = (theirs.node_count(), theirs.input_count());
            if expected != actual {
                return Err(NetworkError::LayerShape {
                    layer: i,
                    expected,
                    actual,
                });
            }
        }
        self.layers = layers.to_vec();
        Ok(())
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<(), NetworkError> {
        if inputs.len() != self.input_count {
            return Err(NetworkError::InputLength {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }
        Ok(())
    }
}
