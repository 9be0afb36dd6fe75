//! Reproducible random number generation for training runs.

use std::{fmt, str::FromStr};

use rand::{
    Rng,
    SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 128-bit seed for a training run.
///
/// Every random draw of a run (initial weights, mutations, simulated worlds)
/// comes from the [`Pcg32`] built by [`Self::rng`], so two runs with the same
/// seed and configuration produce identical populations.
///
/// Seeds are written as 32 lowercase hex digits, both by [`fmt::Display`] and
/// in serialized form.
///
/// # Examples
///
/// ```
/// use evonet_training::seed::Seed;
/// use rand::Rng as _;
///
/// let seed: Seed = rand::rng().random();
/// let parsed: Seed = seed.to_string().parse()?;
/// assert_eq!(parsed, seed);
///
/// let a = seed.rng().random::<u64>();
/// let b = parsed.rng().random::<u64>();
/// assert_eq!(a, b);
/// # Ok::<(), evonet_training::seed::SeedParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    #[display("invalid seed: expected 32 hex characters, got {len}")]
    Length { len: usize },
    #[display("invalid seed: {text:?} is not hexadecimal")]
    NotHex { text: String },
}

impl Seed {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl From<u128> for Seed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for Seed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(SeedParseError::Length { len: s.len() });
        }
        // from_str_radix accepts a leading sign
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SeedParseError::NotHex { text: s.to_owned() });
        }
        let num = u128::from_str_radix(s, 16)
            .map_err(|_| SeedParseError::NotHex { text: s.to_owned() })?;
        Ok(Self::from(num))
    }
}

impl Serialize for Seed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<Seed>()`.
impl Distribution<Seed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Seed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        Seed(seed)
    }
}
