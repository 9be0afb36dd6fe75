//! The capability set shared by both network representations.

use rand::Rng;

use crate::{Network, NetworkError, PackedNetwork};

/// Returns the index of the largest output, considering only outputs strictly
/// greater than zero.
///
/// The running maximum starts at zero and only a strictly greater value replaces
/// it, so the first of several equal maxima wins and `None` is returned when no
/// output is positive (an agent should take no action in that case).
///
/// # Examples
///
/// ```
/// use evonet_engine::best_index;
///
/// assert_eq!(best_index(&[0.1, 5.0, 2.0]), Some(1));
/// assert_eq!(best_index(&[-1.0, -2.0, -3.0]), None);
/// assert_eq!(best_index(&[0.0, 0.0]), None);
/// ```
pub fn best_index<T>(outputs: &[T]) -> Option<usize>
where
    T: Copy + Default + PartialOrd,
{
    let mut max = T::default();
    let mut best = None;
    for (i, &value) in outputs.iter().enumerate() {
        if value > max {
            max = value;
            best = Some(i);
        }
    }
    best
}

/// Operations an evolvable network supports.
///
/// Copy and equality come from the [`Clone`] and [`PartialEq`] supertraits; a
/// clone never shares mutable state with its source.
pub trait Brain: Clone + PartialEq {
    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized;

    fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized;

    /// Maps an input vector to an output vector using the network's own
    /// activation settings.
    fn outputs(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError>;

    /// Evaluates and picks an action with [`best_index`].
    fn action(&self, inputs: &[f64]) -> Result<Option<usize>, NetworkError> {
        Ok(best_index(&self.outputs(inputs)?))
    }
}

impl Brain for Network {
    fn input_count(&self) -> usize {
        Network::input_count(self)
    }

    fn output_count(&self) -> usize {
        Network::output_count(self)
    }

    fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        Network::randomize(self, rng);
    }

    fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        Network::mutate(self, chance, amount, rng);
    }

    fn outputs(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.evaluate(inputs, self.activation())
    }
}

impl Brain for PackedNetwork {
    fn input_count(&self) -> usize {
        PackedNetwork::input_count(self)
    }

    fn output_count(&self) -> usize {
        PackedNetwork::output_count(self)
    }

    fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        PackedNetwork::randomize(self, rng);
    }

    fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        PackedNetwork::mutate(self, chance, amount, rng);
    }

    fn outputs(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        #[expect(clippy::cast_possible_truncation)]
        let inputs = inputs.iter().map(|&x| x as f32).collect::<Vec<_>>();
        Ok(self
            .evaluate(&inputs)?
            .into_iter()
            .map(f64::from)
            .collect())
    }
}

/// Either network representation, chosen at runtime.
#[derive(Debug, Clone, PartialEq, derive_more::From, derive_more::IsVariant)]
pub enum AnyBrain {
    Scalar(Network),
    Packed(PackedNetwork),
}

impl Brain for AnyBrain {
    fn input_count(&self) -> usize {
        match self {
            Self::Scalar(n) => Brain::input_count(n),
            Self::Packed(n) => Brain::input_count(n),
        }
    }

    fn output_count(&self) -> usize {
        match self {
            Self::Scalar(n) => Brain::output_count(n),
            Self::Packed(n) => Brain::output_count(n),
        }
    }

    fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Scalar(n) => n.randomize(rng),
            Self::Packed(n) => n.randomize(rng),
        }
    }

    fn mutate<R>(&mut self, chance: f64, amount: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Scalar(n) => n.mutate(chance, amount, rng),
            Self::Packed(n) => n.mutate(chance, amount, rng),
        }
    }

    fn outputs(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        match self {
            Self::Scalar(n) => n.outputs(inputs),
            Self::Packed(n) => n.outputs(inputs),
        }
    }
}
