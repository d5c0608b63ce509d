//! The parameter completion engine.
//!
//! Three stages, each monotone: a present field is never overwritten.
//! Stage A ([`Rsa::basic_regen`]) derives fields from algebraic identities,
//! Stage B ([`Rsa::wieners_attack`]) tries cryptanalytic recovery from the
//! public pair alone, and Stage C fills whatever is left from random bits.

use num_bigint::{BigInt, BigUint, ToBigInt};
use num_traits::{One, Zero};
use rand::Rng;

use super::cf::{continued_fraction, convergent};
use super::primes::gen_prime;
use super::util::mod_inverse;
use super::Rsa;

/// Solve `p + q = n - phi + 1`, `p * q = n` as a quadratic.
///
/// Runs over `BigInt` so that an inconsistent `phi` (larger than `n + 1`, or
/// a garbage Wiener guess) cannot underflow. `None` when the discriminant or
/// either root is non-positive; the returned pair has `p <= q`.
fn factor_from_totient(n: &BigUint, phi: &BigUint) -> Option<(BigUint, BigUint)> {
    let n = n.to_bigint().unwrap();
    let p_plus_q = &n - phi.to_bigint().unwrap() + 1;
    let discrim: BigInt = &p_plus_q * &p_plus_q - BigInt::from(4_usize) * &n;

    if discrim <= BigInt::zero() {
        return None;
    }

    let middle: BigInt = &p_plus_q / 2u32;
    let diff: BigInt = discrim.sqrt() / 2u32;

    let p = (&middle - &diff).to_biguint()?;
    let q = (middle + diff).to_biguint()?;

    if p.is_zero() || q.is_zero() {
        return None;
    }

    Some((p, q))
}

impl Rsa {
    /// Derive missing fields from the algebraic relations between the ones
    /// present.
    ///
    /// The five `p`/`q` rules are mutually exclusive and guarded on one of
    /// the primes being absent, so nothing present is ever overwritten; the
    /// later rules then cascade (`n` and `phi` from the primes, `e` and `d`
    /// from each other and `phi`).
    pub fn basic_regen(&mut self) {
        let one = BigUint::one();

        // Regenerating the primes
        if self.p.is_none() || self.q.is_none() {
            if let (Some(n), Some(q)) = (&self.n, &self.q) {
                self.p = Some(n / q);
            } else if let (Some(n), Some(p)) = (&self.n, &self.p) {
                self.q = Some(n / p);
            } else if let (Some(phi), Some(q)) = (&self.phi, &self.q) {
                self.p = Some(phi / (q - &one) + &one);
            } else if let (Some(phi), Some(p)) = (&self.phi, &self.p) {
                self.q = Some(phi / (p - &one) + &one);
            } else if let (Some(n), Some(phi)) = (&self.n, &self.phi) {
                if let Some((p, q)) = factor_from_totient(n, phi) {
                    self.p = Some(p);
                    self.q = Some(q);
                }
            }
        }

        // Regenerating n and phi
        if self.n.is_none() {
            if let (Some(p), Some(q)) = (&self.p, &self.q) {
                self.n = Some(p * q);
            }
        }
        if self.phi.is_none() {
            if let (Some(p), Some(q)) = (&self.p, &self.q) {
                self.phi = Some((p - &one) * (q - &one));
            }
        }

        // Regenerating the exponents from each other
        if self.e.is_none() {
            if let (Some(d), Some(phi)) = (&self.d, &self.phi) {
                self.e = Some(mod_inverse(d, phi));
            }
        }
        if self.d.is_none() {
            if let (Some(e), Some(phi)) = (&self.e, &self.phi) {
                self.d = Some(mod_inverse(e, phi));
            }
        }
    }

    /// [Wiener's attack](https://en.wikipedia.org/wiki/Wiener%27s_attack):
    /// recover the private key from `(e, n)` alone when `d < n^(1/4) / 3`.
    ///
    /// Walks the convergents `k / d` of the continued fraction of `e / n`.
    /// Each one yields a totient guess `(e * d - 1) / k` by plain integer
    /// division; false convergents produce nonsense that the `p * q == n`
    /// acceptance test throws away. Gives up once `d^4 > n`, past Wiener's
    /// bound.
    ///
    /// On success fills the absent fields among `p`, `q`, `phi`, `d` and
    /// returns `true`. Writes nothing on failure.
    pub fn wieners_attack(&mut self) -> bool {
        let (e, n) = match (&self.e, &self.n) {
            (Some(e), Some(n)) => (e.clone(), n.clone()),
            _ => return false,
        };

        let en_frac = continued_fraction(&e, &n);

        for index in 0..en_frac.len() {
            let (k, d) = convergent(&en_frac, index);

            if k.is_zero() {
                continue;
            }

            let phi = (&e * &d - BigUint::one()) / &k;

            if let Some((p, q)) = factor_from_totient(&n, &phi) {
                // If p * q = n, we've found a match!
                if &p * &q == n {
                    if self.p.is_none() {
                        self.p = Some(p);
                    }
                    if self.q.is_none() {
                        self.q = Some(q);
                    }
                    if self.phi.is_none() {
                        self.phi = Some(phi);
                    }
                    if self.d.is_none() {
                        self.d = Some(d);
                    }

                    return true;
                }
            }

            // Past this point d is too large for the attack to ever work
            if d.pow(4) > n {
                break;
            }
        }

        false
    }

    /// Complete the state: algebraic inference, then Wiener's attack when
    /// the public pair is known but the private side is not, then random
    /// generation for whatever is still missing.
    ///
    /// Returns one tag character per field that was filled *from random
    /// bits* (`p`, `q`, `e`); algebraically derived fields are not reported.
    ///
    /// # Panics
    ///
    /// If random fill is reached with `pq_len` or `e_len` zero.
    pub fn gen_key_from<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pq_len: usize,
        e_len: usize,
    ) -> String {
        let mut rand_gen = String::new();

        self.basic_regen();

        // Trying common attacks
        if self.e.is_some()
            && self.n.is_some()
            && (self.p.is_none() || self.q.is_none() || self.phi.is_none() || self.d.is_none())
        {
            self.wieners_attack();
        }

        // Randomly regenerating any remaining fields
        if self.p.is_none() {
            self.p = Some(gen_prime(rng, pq_len));
            rand_gen.push('p');
        }
        if self.q.is_none() {
            let p = self.p.as_ref().unwrap();
            let mut q = gen_prime(rng, pq_len);
            while &q == p {
                q = gen_prime(rng, pq_len);
            }

            self.q = Some(q);
            rand_gen.push('q');
        }
        if self.n.is_none() {
            let (p, q) = (self.p.as_ref().unwrap(), self.q.as_ref().unwrap());

            self.n = Some(p * q);
        }
        if self.phi.is_none() {
            let (p, q) = (self.p.as_ref().unwrap(), self.q.as_ref().unwrap());
            let one = BigUint::one();

            self.phi = Some((p - &one) * (q - &one));
        }
        if self.e.is_none() {
            self.e = Some(gen_prime(rng, e_len));
            rand_gen.push('e');
        }
        if self.d.is_none() {
            let (e, phi) = (self.e.as_ref().unwrap(), self.phi.as_ref().unwrap());

            self.d = Some(mod_inverse(e, phi));
        }

        rand_gen
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::super::Rsa;
    use super::factor_from_totient;

    fn big(n: usize) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_factor_from_totient() {
        assert_eq!(
            factor_from_totient(&big(3233), &big(3120)),
            Some((big(53), big(61))),
        );
        assert_eq!(
            factor_from_totient(&big(90581), &big(89964)),
            Some((big(239), big(379))),
        );
    }

    #[test]
    fn test_factor_from_totient_rejects_garbage() {
        // phi > n + 1 drives the sum negative
        assert_eq!(factor_from_totient(&big(3233), &big(4000)), None);
        // non-positive discriminant
        assert_eq!(factor_from_totient(&big(3233), &big(3233)), None);
    }

    #[test]
    fn test_basic_regen_from_primes_and_e() {
        let mut rsa = Rsa::new();
        rsa.set_int('p', big(61));
        rsa.set_int('q', big(53));
        rsa.set_int('e', big(17));

        rsa.basic_regen();

        assert_eq!(rsa.get('n'), Some(&big(3233)));
        assert_eq!(rsa.get('t'), Some(&big(3120)));
        assert_eq!(rsa.get('d'), Some(&big(2753)));
    }

    #[test]
    fn test_basic_regen_prime_from_n() {
        let mut rsa = Rsa::new();
        rsa.set_int('n', big(3233));
        rsa.set_int('p', big(61));

        rsa.basic_regen();

        assert_eq!(rsa.get('q'), Some(&big(53)));
        assert_eq!(rsa.get('t'), Some(&big(3120)));
    }

    #[test]
    fn test_basic_regen_prime_from_totient() {
        let mut rsa = Rsa::new();
        rsa.set_int('t', big(3120));
        rsa.set_int('q', big(53));

        rsa.basic_regen();

        assert_eq!(rsa.get('p'), Some(&big(61)));
        assert_eq!(rsa.get('n'), Some(&big(3233)));
    }

    #[test]
    fn test_basic_regen_primes_from_n_and_totient() {
        let mut rsa = Rsa::new();
        rsa.set_int('n', big(3233));
        rsa.set_int('t', big(3120));

        rsa.basic_regen();

        assert_eq!(rsa.get('p'), Some(&big(53)));
        assert_eq!(rsa.get('q'), Some(&big(61)));
    }

    #[test]
    fn test_basic_regen_e_from_d() {
        let mut rsa = Rsa::new();
        rsa.set_int('d', big(2753));
        rsa.set_int('t', big(3120));

        rsa.basic_regen();

        assert_eq!(rsa.get('e'), Some(&big(17)));
    }

    #[test]
    fn test_basic_regen_never_overwrites() {
        let mut rsa = Rsa::new();
        rsa.set_int('p', big(61));
        rsa.set_int('q', big(53));
        rsa.set_int('n', big(9999)); // inconsistent on purpose
        rsa.set_int('t', big(8888));
        rsa.set_int('e', big(17));
        rsa.set_int('d', big(5));

        rsa.basic_regen();

        assert_eq!(rsa.get('n'), Some(&big(9999)));
        assert_eq!(rsa.get('t'), Some(&big(8888)));
        assert_eq!(rsa.get('e'), Some(&big(17)));
        assert_eq!(rsa.get('d'), Some(&big(5)));
    }

    #[test]
    fn test_wieners_attack_textbook_case() {
        let mut rsa = Rsa::new();
        rsa.set_int('e', big(17993));
        rsa.set_int('n', big(90581));

        assert!(rsa.wieners_attack());

        assert_eq!(rsa.get('d'), Some(&big(5)));
        assert_eq!(rsa.get('p'), Some(&big(239)));
        assert_eq!(rsa.get('q'), Some(&big(379)));
        assert_eq!(rsa.get('t'), Some(&big(89964)));
    }

    #[test]
    fn test_wieners_attack_needs_public_pair() {
        let mut rsa = Rsa::new();
        rsa.set_int('e', big(17993));

        assert!(!rsa.wieners_attack());
        assert_eq!(rsa, {
            let mut expected = Rsa::new();
            expected.set_int('e', big(17993));
            expected
        });
    }

    #[test]
    fn test_wieners_attack_fails_on_large_d() {
        // d = 2753 is far above n^(1/4): the attack must give up cleanly
        // and leave the state untouched.
        let mut rsa = Rsa::new();
        rsa.set_int('e', big(17));
        rsa.set_int('n', big(3233));

        assert!(!rsa.wieners_attack());
        assert_eq!(rsa.get('d'), None);
        assert_eq!(rsa.get('p'), None);
    }

    #[test]
    fn test_gen_key_from_algebraic_only() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut rsa = Rsa::new();
        rsa.set_int('p', big(61));
        rsa.set_int('q', big(53));
        rsa.set_int('e', big(17));

        let rand_gen = rsa.gen_key_from(&mut rng, 200, 5);

        assert_eq!(rand_gen, "");
        assert_eq!(rsa.get('n'), Some(&big(3233)));
        assert_eq!(rsa.get('t'), Some(&big(3120)));
        assert_eq!(rsa.get('d'), Some(&big(2753)));
    }

    #[test]
    fn test_gen_key_from_wiener_path() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut rsa = Rsa::new();
        rsa.set_int('e', big(17993));
        rsa.set_int('n', big(90581));

        let rand_gen = rsa.gen_key_from(&mut rng, 200, 5);

        assert_eq!(rand_gen, "");
        assert_eq!(rsa.get('d'), Some(&big(5)));
        assert_eq!(rsa.get('p'), Some(&big(239)));
        assert_eq!(rsa.get('q'), Some(&big(379)));
        assert_eq!(rsa.get('t'), Some(&big(89964)));
    }

    #[test]
    fn test_gen_key_from_empty_state_reports_random_tags() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut rsa = Rsa::new();

        let rand_gen = rsa.gen_key_from(&mut rng, 8, 3);

        assert_eq!(rand_gen, "pqe");

        let p = rsa.get('p').unwrap().clone();
        let q = rsa.get('q').unwrap().clone();
        let one = BigUint::from(1_usize);

        assert_ne!(p, q);
        assert_eq!(rsa.get('n'), Some(&(&p * &q)));
        assert_eq!(rsa.get('t'), Some(&((&p - &one) * (&q - &one))));
    }

    #[test]
    fn test_gen_key_from_partial_random_fill() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut rsa = Rsa::new();
        rsa.set_int('p', big(61));

        let rand_gen = rsa.gen_key_from(&mut rng, 2, 5);

        // q and e came from random bits; n, phi and d were derived.
        assert_eq!(rand_gen, "qe");
        assert_eq!(rsa.get('p'), Some(&big(61)));
        assert!(rsa.get('n').is_some());
        assert!(rsa.get('t').is_some());
        assert!(rsa.get('d').is_some());
    }
}
