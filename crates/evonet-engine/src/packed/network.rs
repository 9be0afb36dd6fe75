use rand::Rng;

use crate::{Activation, LayerOptions, NetworkError, PackedLayer, brain};

/// Feedforward network built from [`PackedLayer`]s.
///
/// Unlike [`Network`](crate::Network), layer widths chain: hidden layer `i`
/// reads the outputs of hidden layer `i - 1`, and the output layer reads the
/// last hidden layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedNetwork {
    input_count: usize,
    output_count: usize,
    layers: Vec<PackedLayer>,
}

impl PackedNetwork {
    /// Creates a zeroed network with one hidden layer per entry of
    /// `hidden_sizes`. Every layer uses the same activation and options.
    ///
    /// Fails with [`NetworkError::NoOutputs`] if `output_count` is zero.
    pub fn new(
        input_count: usize,
        output_count: usize,
        hidden_sizes: &[usize],
        activation: Activation,
        options: LayerOptions,
    ) -> Result<Self, NetworkError> {
        if output_count < 1 {
            return Err(NetworkError::NoOutputs);
        }
        let mut layers = Vec::with_capacity(hidden_sizes.len() + 1);
        let mut width = input_count;
        for &size in hidden_sizes.iter().chain([&output_count]) {
            layers.push(PackedLayer::new(width, size, activation, options));
            width = size;
        }
        Ok(Self {
            input_count,
            output_count,
            layers,
        })
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Output widths of the hidden layers.
    #[must_use]
    pub fn hidden_sizes(&self) -> Vec<usize> {
        self.layers[..self.layers.len() - 1]
            .iter()
            .map(PackedLayer::output_count)
            .collect()
    }

    #[must_use]
    pub fn layers(&self) -> &[PackedLayer] {
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

    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, NetworkError> {
        if inputs.len() != self.input_count {
            return Err(NetworkError::InputLength {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }
        let mut values = inputs.to_vec();
        for layer in &self.layers {
            values = layer.evaluate(&values)?;
        }
        Ok(values)
    }

    /// Evaluates and returns the index of the largest strictly positive output.
    pub fn best_index(&self, inputs: &[f32]) -> Result<Option<usize>, NetworkError> {
        Ok(brain::best_index(&self.evaluate(inputs)?))
    }

    /// Replaces every layer with a copy of `layers`.
    ///
    /// Fails, leaving `self` untouched, unless both stacks have the same depth and
    /// every pair of layers has the same weight matrix shape and bias mode.
    pub fn copy_from(&mut self, layers: &[PackedLayer]) -> Result<(), NetworkError> {
        if layers.len() != self.layers.len() {
            return Err(NetworkError::LayerCount {
                expected: self.layers.len(),
                actual: layers.len(),
            });
        }
        for (i, (ours, theirs)) in self.layers.iter().zip(layers).enumerate() {
            if ours.weights().shape() != theirs.weights().shape() || ours.bias() != theirs.bias()
            {
                return Err(NetworkError::LayerShape {
                    layer: i,
                    expected: (ours.input_count(), ours.output_count()),
                    actual: (theirs.input_count(), theirs.output_count()),
                });
            }
        }
        self.layers = layers.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{BiasMode, ExecutionStrategy, Matrix};

    fn random_network(seed: u64, hidden: &[usize], options: LayerOptions) -> PackedNetwork {
        let mut network = PackedNetwork::new(6, 3, hidden, Activation::Relu, options).unwrap();
        network.randomize(&mut Pcg32::seed_from_u64(seed));
        network
    }

    #[test]
    fn test_zero_outputs_is_invalid_argument() {
        assert_eq!(
            PackedNetwork::new(3, 0, &[4], Activation::Relu, LayerOptions::default()),
            Err(NetworkError::NoOutputs)
        );
    }

    #[test]
    fn test_layers_chain_widths() {
        let network = random_network(40, &[8, 5], LayerOptions::default());
        let shapes = network
            .layers()
            .iter()
            .map(|l| (l.input_count(), l.output_count()))
            .collect::<Vec<_>>();
        assert_eq!(shapes, vec![(6, 8), (8, 5), (5, 3)]);
        assert_eq!(network.hidden_sizes(), vec![8, 5]);

        let outputs = network.evaluate(&[0.5; 6]).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_bias_adds_weight_row() {
        let options = LayerOptions {
            bias: BiasMode::ConstantInput,
            ..LayerOptions::default()
        };
        let network = random_network(41, &[4], options);
        let rows = network
            .layers()
            .iter()
            .map(|l| l.weights().rows())
            .collect::<Vec<_>>();
        assert_eq!(rows, vec![7, 5]);
        assert_eq!(network.evaluate(&[0.0; 6]).unwrap().len(), 3);
    }

    #[test]
    fn test_evaluate_is_pure_and_checks_length() {
        let network = random_network(42, &[10], LayerOptions::default());
        let inputs = [0.1, 0.2, 0.3, -0.4, 0.5, 0.6];
        assert_eq!(
            network.evaluate(&inputs).unwrap(),
            network.evaluate(&inputs).unwrap()
        );
        assert_eq!(
            network.evaluate(&inputs[..5]),
            Err(NetworkError::InputLength {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_forced_parallel_matches_serial() {
        let serial = random_network(
            43,
            &[64, 32],
            LayerOptions {
                parallel_cutoff: usize::MAX,
                ..LayerOptions::default()
            },
        );
        let parallel_options = LayerOptions {
            force_parallel: true,
            ..LayerOptions::default()
        };
        let mut parallel = PackedNetwork::new(6, 3, &[64, 32], Activation::Relu, parallel_options)
            .unwrap();
        for (target, source) in parallel.layers.iter_mut().zip(serial.layers()) {
            target.copy_weights(source.weights()).unwrap();
        }
        assert!(
            parallel
                .layers()
                .iter()
                .all(|l| l.strategy() == ExecutionStrategy::Parallel)
        );
        let inputs = [1.0, -1.0, 0.5, 0.25, -0.75, 2.0];
        let a = Matrix::row_vector(serial.evaluate(&inputs).unwrap());
        let b = Matrix::row_vector(parallel.evaluate(&inputs).unwrap());
        assert!(a.approx_eq(&b, 1e-5));
    }

    #[test]
    fn test_clone_and_mutate() {
        let mut rng = Pcg32::seed_from_u64(44);
        let source = random_network(44, &[4], LayerOptions::default());
        let snapshot = source.clone();
        let mut copy = source.clone();
        assert_eq!(copy, source);

        copy.mutate(0.0, 10.0, &mut rng);
        assert_eq!(copy, source);
        copy.mutate(1.0, 0.0, &mut rng);
        assert_eq!(copy, source);
        copy.mutate(0.5, 1.0, &mut rng);
        assert_ne!(copy, source);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_copy_from() {
        let source = random_network(45, &[4], LayerOptions::default());
        let mut target =
            PackedNetwork::new(6, 3, &[4], Activation::Relu, LayerOptions::default()).unwrap();
        target.copy_from(source.layers()).unwrap();
        assert_eq!(target, source);

        let mut deeper =
            PackedNetwork::new(6, 3, &[4, 4], Activation::Relu, LayerOptions::default()).unwrap();
        assert!(matches!(
            deeper.copy_from(source.layers()),
            Err(NetworkError::LayerCount {
                expected: 3,
                actual: 2
            })
        ));

        let mut biased = PackedNetwork::new(
            6,
            3,
            &[4],
            Activation::Relu,
            LayerOptions {
                bias: BiasMode::ConstantInput,
                ..LayerOptions::default()
            },
        )
        .unwrap();
        assert!(matches!(
            biased.copy_from(source.layers()),
            Err(NetworkError::LayerShape { layer: 0, .. })
        ));
    }
}
