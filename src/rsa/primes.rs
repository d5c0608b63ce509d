use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::Rng;

const FIRST_PRIMES_COUNT: usize = 2048;
const FERMAT_ROUNDS: usize = 5;
const RABIN_MILLER_K: usize = 128; // Probability of false-positive is 2^(-k)

pub static FIRST_PRIMES: Lazy<Vec<BigUint>> = Lazy::new(|| {
    let mut primes = Vec::with_capacity(FIRST_PRIMES_COUNT);

    primes.push(2_usize);

    for x in (3_usize..).step_by(2) {
        let is_prime = primes.iter().all(|&prime| x % prime != 0);

        if is_prime {
            primes.push(x);
        }

        if primes.len() == FIRST_PRIMES_COUNT {
            break;
        }
    }

    primes.into_iter().map(BigUint::from).collect()
});

// Basic primality test against the first few primes. Candidates that *are*
// one of the table primes must pass, since next_probable_prime legitimately
// probes single- and double-digit numbers.
fn first_primes(candidate: &BigUint) -> bool {
    for prime in FIRST_PRIMES.iter() {
        if (candidate % prime).is_zero() {
            return candidate == prime;
        }
    }

    true
}

/// [Fermat primality test](https://en.wikipedia.org/wiki/Fermat_primality_test)
fn fermat<R: Rng + ?Sized>(rng: &mut R, candidate: &BigUint) -> bool {
    let two = BigUint::from(2_usize);

    for _k in 0..FERMAT_ROUNDS {
        let basis = rng.gen_biguint_range(&two, candidate);
        let result = basis.modpow(&(candidate - BigUint::one()), candidate);

        if !result.is_one() {
            return false;
        }
    }

    true
}

// Rewrite into `n = 2^s*d`
fn rewrite(mut d: BigUint) -> (BigUint, BigUint) {
    let mut s = BigUint::zero();
    let one = BigUint::one();

    while d.is_even() {
        d >>= 1;
        s += &one;
    }

    (s, d)
}

// [Rabin-Miller primality test](https://en.wikipedia.org/wiki/Miller%E2%80%93Rabin_primality_test)
fn rabin_miller<R: Rng + ?Sized>(rng: &mut R, candidate: &BigUint) -> bool {
    let zero = BigUint::zero();
    let one = BigUint::one();
    let two = &one + &one;

    if candidate == &two {
        return true;
    } else if candidate.is_even() {
        return false;
    }

    let candidate_minus_one = candidate - &one;

    let (s, d) = rewrite(candidate_minus_one.clone());

    for _k in (0..RABIN_MILLER_K).step_by(2) {
        let basis = rng.gen_biguint_range(&two, candidate);

        let mut v = basis.modpow(&d, candidate);

        if v.is_one() || v == candidate_minus_one {
            continue;
        }

        for i in num_iter::range_from(zero.clone()) {
            v = v.modpow(&two, candidate);

            if v == candidate_minus_one {
                break;
            } else if v.is_one() || i == (&s - &one) {
                return false;
            }
        }
    }

    true
}

/// Is `candidate` prime, with overwhelming probability?
///
/// Trial division by the first few primes, then Fermat, then Rabin-Miller.
pub fn is_probable_prime<R: Rng + ?Sized>(rng: &mut R, candidate: &BigUint) -> bool {
    if candidate < &BigUint::from(2_usize) {
        return false;
    }

    if !first_primes(candidate) {
        return false;
    }

    // Anything still undecided is larger than every table prime, so the
    // randomized tests have room to draw bases from [2, candidate).
    if candidate <= FIRST_PRIMES.last().unwrap() {
        return true;
    }

    fermat(rng, candidate) && rabin_miller(rng, candidate)
}

/// The smallest probable prime strictly greater than `n`.
pub fn next_probable_prime<R: Rng + ?Sized>(rng: &mut R, n: &BigUint) -> BigUint {
    let one = BigUint::one();
    let two = BigUint::from(2_usize);

    if n < &two {
        return two;
    }

    // Candidates above 2 are only ever odd.
    let mut candidate = n + &one;
    if candidate.is_even() {
        candidate += &one;
    }

    loop {
        if is_probable_prime(rng, &candidate) {
            return candidate;
        }

        candidate += &two;
    }
}

/// Generate a probable prime of at least `digits` decimal digits.
///
/// Builds a uniform `digits`-digit decimal number (leading digit 1-9) and
/// takes the next probable prime strictly above it.
///
/// # Panics
///
/// If `digits` is zero.
pub fn gen_prime<R: Rng + ?Sized>(rng: &mut R, digits: usize) -> BigUint {
    assert!(digits > 0, "gen_prime: need at least one digit");

    let mut decimal = String::with_capacity(digits);

    decimal.push(char::from(b'0' + rng.gen_range(1..=9)));
    for _ in 1..digits {
        decimal.push(char::from(b'0' + rng.gen_range(0..=9)));
    }

    let seed: BigUint = decimal.parse().expect("digits form a decimal number");

    next_probable_prime(rng, &seed)
}
