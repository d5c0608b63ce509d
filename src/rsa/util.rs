use num_bigint::{BigInt, BigUint, ToBigInt};
use num_traits::{One, Signed, Zero};

/// [Modular multiplicative inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse)
///
/// Returns the least non-negative `x` with `a * x ≡ 1 (mod modulus)`,
/// via the [extended Euclidean algorithm](https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm)
/// carrying only the Bézout coefficient of `a` (the coefficient of
/// `modulus` is never needed). The raw coefficient can come out negative;
/// adding `modulus` back brings it into `[0, modulus)`.
///
/// Callers must guarantee `gcd(a, modulus) = 1`; otherwise the returned
/// value satisfies no congruence and is unspecified.
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> BigUint {
    let modulus_int = modulus.to_bigint().unwrap();

    let mut r_prev = a.to_bigint().unwrap();
    let mut r = modulus_int.clone();
    let mut coeff_prev = BigInt::one();
    let mut coeff = BigInt::zero();

    while !r.is_zero() {
        let quotient = &r_prev / &r;

        let r_next = r_prev - &quotient * &r;
        r_prev = r;
        r = r_next;

        let coeff_next = coeff_prev - &quotient * &coeff;
        coeff_prev = coeff;
        coeff = coeff_next;
    }

    while coeff_prev.is_negative() {
        coeff_prev += &modulus_int;
    }

    coeff_prev.to_biguint().unwrap()
}

/// [Modular exponentiation](https://en.wikipedia.org/wiki/Modular_exponentiation)
/// by right-to-left square-and-multiply over the bits of `exp`.
///
/// `exp = 0` yields `1 mod modulus`, so a modulus of one yields zero.
///
/// # Panics
///
/// If `modulus` is zero.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    assert!(!modulus.is_zero(), "mod_pow: modulus must be non-zero");

    if modulus.is_one() {
        return BigUint::zero();
    }

    let mut product = BigUint::one();
    let mut square = base % modulus;

    for i in 0..exp.bits() {
        if exp.bit(i) {
            product = product * &square % modulus;
        }

        square = &square * &square % modulus;
    }

    product
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use num_integer::Integer;
    use num_traits::{One, Zero};

    use super::{mod_inverse, mod_pow};

    #[test]
    fn test_mod_inverse() {
        assert_eq!(
            mod_inverse(&BigUint::from(17_usize), &BigUint::from(3120_usize)),
            BigUint::from(2753_usize),
        );
    }

    #[test]
    fn test_mod_inverse_small_coprimes() {
        for m in 3_usize..60 {
            for a in 2..m {
                let a = BigUint::from(a);
                let m = BigUint::from(m);

                if !a.gcd(&m).is_one() {
                    continue;
                }

                let inverse = mod_inverse(&a, &m);

                assert!(inverse > BigUint::zero());
                assert!(inverse < m);
                assert!((a * inverse % m).is_one());
            }
        }
    }

    #[test]
    fn test_mod_inverse_of_larger_argument() {
        // a > modulus works the same; 2753 * 17 ≡ 1 (mod 3120)
        assert_eq!(
            mod_inverse(&BigUint::from(2753_usize), &BigUint::from(17_usize)),
            BigUint::from(16_usize),
        );
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(
            mod_pow(
                &BigUint::from(65_usize),
                &BigUint::from(17_usize),
                &BigUint::from(3233_usize),
            ),
            BigUint::from(2790_usize),
        );
        assert_eq!(
            mod_pow(
                &BigUint::from(2790_usize),
                &BigUint::from(2753_usize),
                &BigUint::from(3233_usize),
            ),
            BigUint::from(65_usize),
        );
    }

    #[test]
    fn test_mod_pow_against_naive() {
        for base in 0_usize..8 {
            for exp in 0_u32..8 {
                for modulus in 1_usize..12 {
                    let expected = BigUint::from(base.pow(exp) % modulus);

                    assert_eq!(
                        mod_pow(
                            &BigUint::from(base),
                            &BigUint::from(exp as usize),
                            &BigUint::from(modulus),
                        ),
                        expected,
                    );
                }
            }
        }
    }

    #[test]
    fn test_mod_pow_zero_exponent() {
        assert_eq!(
            mod_pow(
                &BigUint::from(12345_usize),
                &BigUint::zero(),
                &BigUint::from(7_usize),
            ),
            BigUint::one(),
        );
    }

    #[test]
    fn test_mod_pow_modulus_one() {
        assert_eq!(
            mod_pow(
                &BigUint::from(12345_usize),
                &BigUint::from(678_usize),
                &BigUint::one(),
            ),
            BigUint::zero(),
        );
    }
}
