//! Matrix network representation.
//!
//! Each [`PackedLayer`] holds one dense weight matrix instead of per-node weight
//! vectors, plus its activation and the [`ExecutionStrategy`](crate::ExecutionStrategy)
//! chosen from its width. Bias is optional and modelled as an extra constant
//! input (see [`BiasMode`]) rather than a separate field.
//!
//! # Example
//!
//! ```
//! use evonet_engine::{Activation, BiasMode, LayerOptions, PackedNetwork};
//!
//! let options = LayerOptions {
//!     bias: BiasMode::ConstantInput,
//!     ..LayerOptions::default()
//! };
//! let mut network = PackedNetwork::new(4, 2, &[16, 8], Activation::Relu, options)?;
//! network.randomize(&mut rand::rng());
//!
//! let outputs = network.evaluate(&[0.0, 1.0, 0.5, -0.5])?;
//! assert_eq!(outputs.len(), 2);
//! # Ok::<(), evonet_engine::NetworkError>(())
//! ```

pub use self::{
    layer::{BiasMode, DEFAULT_PARALLEL_CUTOFF, LayerOptions, PackedLayer},
    network::PackedNetwork,
};

mod layer;
mod network;
