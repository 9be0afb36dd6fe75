use serde::{Deserialize, Serialize};

use crate::Matrix;

/// Elementwise nonlinearity applied after a weighted sum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `x`
    Identity,
    /// Logistic function `1 / (1 + e^-x)`
    Sigmoid,
    /// `max(0, x)`
    Relu,
    /// `atan(x)`
    Arctan,
}

impl Activation {
    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Relu => x.max(0.0),
            Self::Arctan => x.atan(),
        }
    }

    #[must_use]
    pub fn apply_f32(self, x: f32) -> f32 {
        match self {
            Self::Identity => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Relu => x.max(0.0),
            Self::Arctan => x.atan(),
        }
    }

    pub fn apply_slice(self, values: &mut [f64]) {
        if self != Self::Identity {
            for v in values {
                *v = self.apply(*v);
            }
        }
    }

    pub fn apply_matrix(self, matrix: &mut Matrix) {
        if self != Self::Identity {
            for v in matrix.as_mut_slice() {
                *v = self.apply_f32(*v);
            }
        }
    }
}
