use rand::Rng;
use rand_distr::StandardNormal;

use crate::{Activation, NetworkError};

/// A single neuron: one weight per input plus a bias.
///
/// The number of weights is fixed at construction. Equality is exact: two nodes
/// are equal only if every weight and the bias compare equal as `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    weights: Vec<f64>,
    bias: f64,
}

impl Node {
    /// Creates a node taking `input_count` inputs, with all weights and the bias
    /// set to zero.
    ///
    /// Call [`Self::randomize`] before use.
    #[must_use]
    pub fn new(input_count: usize) -> Self {
        Self {
            weights: vec![0.0; input_count],
            bias: 0.0,
        }
    }

    #[must_use]
    pub fn with_values(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Overwrites the weights and bias with copies of the given values.
    ///
    /// Fails if `weights` does not have exactly [`Self::input_count`] entries.
    pub fn copy_values(&mut self, weights: &[f64], bias: f64) -> Result<(), NetworkError> {
        if weights.len() != self.weights.len() {
            return Err(NetworkError::InputLength {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }
        self.weights.copy_from_slice(weights);
        self.bias = bias;
        Ok(())
    }

    /// Draws fresh weights and bias.
    ///
    /// With `n` inputs, each weight is `N(0, 1) / sqrt(n)` and the bias is
    /// `N(0, 1) / sqrt(2 / n)`.
    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let n = self.weights.len() as f64;
        let weight_scale = n.sqrt();
        for w in &mut self.weights {
            *w = rng.sample::<f64, _>(StandardNormal) / weight_scale;
        }
        self.bias = rng.sample::<f64, _>(StandardNormal) / (2.0 / n).sqrt();
    }

    /// Perturbs each weight, and then the bias, with probability `chance` by a
    /// value drawn uniformly from `[-amount, amount]`.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative or not finite.
    pub fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for w in &mut self.weights {
            if let Some(delta) = crate::mutation::delta(chance, amount, rng) {
                *w += delta;
            }
        }
        if let Some(delta) = crate::mutation::delta(chance, amount, rng) {
            self.bias += delta;
        }
    }

    /// Computes `activation(sum(inputs[i] * weights[i]) + bias)`.
    pub fn evaluate(&self, inputs: &[f64], activation: Activation) -> Result<f64, NetworkError> {
        if inputs.len() != self.weights.len() {
            return Err(NetworkError::InputLength {
                expected: self.weights.len(),
                actual: inputs.len(),
            });
        }
        Ok(activation.apply(self.weighted_sum(inputs)))
    }

    /// Weighted sum plus bias, with no activation and no length check.
    pub(crate) fn weighted_sum(&self, inputs: &[f64]) -> f64 {
        debug_assert_eq!(inputs.len(), self.weights.len());
        let mut sum = 0.0;
        for (x, w) in inputs.iter().zip(&self.weights) {
            sum += x * w;
        }
        sum + self.bias
    }
}
