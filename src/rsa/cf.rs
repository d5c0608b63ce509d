use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// Simple [continued-fraction](https://en.wikipedia.org/wiki/Continued_fraction)
/// expansion of `num / den`.
///
/// The division ladder terminates when the remainder hits zero, so
/// evaluating the full expansion reconstructs `num / den` in lowest terms.
///
/// # Panics
///
/// If `den` is zero.
pub fn continued_fraction(num: &BigUint, den: &BigUint) -> Vec<BigUint> {
    assert!(!den.is_zero(), "continued_fraction: denominator must be non-zero");

    let mut terms = Vec::new();
    let mut num = num.clone();
    let mut den = den.clone();

    loop {
        let (quotient, remainder) = num.div_rem(&den);

        terms.push(quotient);

        if remainder.is_zero() {
            break;
        }

        num = den;
        den = remainder;
    }

    terms
}

/// The `index`-th convergent of the continued fraction `cf`, as
/// `(numerator, denominator)`.
///
/// Collapses the inner fractions before the outer ones: starting from
/// `0 / 1`, each step adds the current term and flips the fraction to move
/// up a layer.
pub fn convergent(cf: &[BigUint], index: usize) -> (BigUint, BigUint) {
    let mut num = BigUint::zero();
    let mut den = BigUint::one();

    for i in (0..=index).rev() {
        num += &cf[i] * &den;

        if i > 0 {
            std::mem::swap(&mut num, &mut den);
        }
    }

    (num, den)
}
