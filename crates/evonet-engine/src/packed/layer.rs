use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::{Activation, ExecutionStrategy, MatMul as _, Matrix, NetworkError};

/// Input width from which a packed layer switches to the parallel strategy.
pub const DEFAULT_PARALLEL_CUTOFF: usize = 128;

/// How a packed layer models bias.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    /// Plain `inputs x weights`.
    #[default]
    None,
    /// A constant `1.0` is appended to every input vector and the weight matrix
    /// has one extra row, whose entries act as the per-output bias.
    ConstantInput,
}

impl BiasMode {
    #[must_use]
    pub fn extra_inputs(self) -> usize {
        match self {
            Self::None => 0,
            Self::ConstantInput => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerOptions {
    pub bias: BiasMode,
    /// Layers whose weight matrix has at least this many rows use
    /// [`ExecutionStrategy::Parallel`].
    pub parallel_cutoff: usize,
    /// Use [`ExecutionStrategy::Parallel`] regardless of size.
    pub force_parallel: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            bias: BiasMode::None,
            parallel_cutoff: DEFAULT_PARALLEL_CUTOFF,
            force_parallel: false,
        }
    }
}

/// One network layer stored as a dense `(inputs x outputs)` weight matrix.
///
/// Evaluating a layer multiplies the `1 x inputs` row vector by the weight
/// matrix with the layer's [`ExecutionStrategy`] and applies the activation to
/// every cell of the result.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLayer {
    weights: Matrix,
    activation: Activation,
    bias: BiasMode,
    strategy: ExecutionStrategy,
}

impl PackedLayer {
    /// Creates a zeroed layer. Call [`Self::randomize`] before use.
    #[must_use]
    pub fn new(
        input_count: usize,
        output_count: usize,
        activation: Activation,
        options: LayerOptions,
    ) -> Self {
        let rows = input_count + options.bias.extra_inputs();
        let strategy =
            ExecutionStrategy::select(rows, options.parallel_cutoff, options.force_parallel);
        tracing::debug!(rows, cols = output_count, ?strategy, "packed layer");
        Self {
            weights: Matrix::zeros(rows, output_count),
            activation,
            bias: options.bias,
            strategy,
        }
    }

    /// Number of values [`Self::evaluate`] expects, excluding the bias input.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.weights.rows() - self.bias.extra_inputs()
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.weights.cols()
    }

    #[must_use]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[must_use]
    pub fn bias(&self) -> BiasMode {
        self.bias
    }

    #[must_use]
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Overwrites the weight matrix with a copy of `weights`.
    ///
    /// Fails if the shapes differ.
    pub fn copy_weights(&mut self, weights: &Matrix) -> Result<(), NetworkError> {
        if weights.shape() != self.weights.shape() {
            return Err(NetworkError::WeightShape {
                expected: self.weights.shape(),
                actual: weights.shape(),
            });
        }
        self.weights.clone_from(weights);
        Ok(())
    }

    /// Draws every entry from `N(0, 1) / sqrt(entry count)`.
    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let scale = (self.weights.len() as f32).sqrt();
        for w in self.weights.as_mut_slice() {
            *w = rng.sample::<f32, _>(StandardNormal) / scale;
        }
    }

    /// Perturbs each entry with probability `chance` by a value drawn uniformly
    /// from `[-amount, amount]`.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative or not finite.
    pub fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for w in self.weights.as_mut_slice() {
            if let Some(delta) = crate::mutation::delta(chance, amount, rng) {
                #[expect(clippy::cast_possible_truncation)]
                let delta = delta as f32;
                *w += delta;
            }
        }
    }

    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.input_count() {
            return Err(NetworkError::InputLength {
                expected: self.input_count(),
                actual: inputs.len(),
            });
        }
        let mut row = Vec::with_capacity(self.weights.rows());
        row.extend_from_slice(inputs);
        if self.bias == BiasMode::ConstantInput {
            row.push(1.0);
        }
        let mut result = self
            .strategy
            .multiply(&Matrix::row_vector(row), &self.weights)?;
        self.activation.apply_matrix(&mut result);
        Ok(result.into_vec())
    }
}
