//! Per-neuron network representation.
//!
//! A [`Network`] is a stack of [`Layer`]s, each an ordered group of [`Node`]s
//! holding one weight per input and an explicit bias. This form is convenient to
//! inspect and is cheap for the small networks used by most agents; see
//! [`packed`](crate::packed) for the matrix form used for wide layers.

pub use self::{layer::Layer, network::Network, node::Node};

mod layer;
mod network;
mod node;
