use rand::Rng;

use crate::{Activation, NetworkError, Node};

/// An ordered group of [`Node`]s that all read the same input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    input_count: usize,
    nodes: Vec<Node>,
}

impl Layer {
    /// Creates `node_count` zeroed nodes, each taking `input_count` inputs.
    #[must_use]
    pub fn new(node_count: usize, input_count: usize) -> Self {
        Self {
            input_count,
            nodes: (0..node_count).map(|_| Node::new(input_count)).collect(),
        }
    }

    /// Builds a layer from existing nodes.
    ///
    /// Fails if any node does not take exactly `input_count` inputs.
    pub fn from_nodes(input_count: usize, nodes: Vec<Node>) -> Result<Self, NetworkError> {
        if let Some((node, n)) = nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.input_count() != input_count)
        {
            return Err(NetworkError::NodeWidth {
                node,
                expected: input_count,
                actual: n.input_count(),
            });
        }
        Ok(Self { input_count, nodes })
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for node in &mut self.nodes {
            node.randomize(rng);
        }
    }

    pub fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for node in &mut self.nodes {
            node.mutate(chance, amount, rng);
        }
    }

    /// Evaluates every node on `inputs`, one output per node.
    pub fn evaluate(&self, inputs: &[f64], activation: Activation) -> Result<Vec<f64>, NetworkError> {
        let mut outputs = self.evaluate_linear(inputs)?;
        activation.apply_slice(&mut outputs);
        Ok(outputs)
    }

    /// Like [`Self::evaluate`] with [`Activation::Identity`].
    pub fn evaluate_linear(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if inputs.len() != self.input_count {
            return Err(NetworkError::InputLength {
                expected: self.input_count,
                actual: inputs.len(),
            });
        }
        Ok(self.nodes.iter().map(|n| n.weighted_sum(inputs)).collect())
    }
}
