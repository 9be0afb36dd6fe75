use rand::Rng;

/// Rolls one mutation: with probability `chance` returns a value drawn uniformly
/// from `[-amount, amount]`.
///
/// `chance <= 0` never mutates and `chance >= 1` always does.
///
/// # Panics
///
/// Panics if `amount` is negative or not finite.
pub(crate) fn delta<R>(chance: f64, amount: f64, rng: &mut R) -> Option<f64>
where
    R: Rng + ?Sized,
{
    assert!(
        amount.is_finite() && amount >= 0.0,
        "mutation amount must be finite and non-negative, got {amount}"
    );
    (rng.random::<f64>() < chance).then(|| rng.random_range(-amount..=amount))
}
