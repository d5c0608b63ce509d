//! The RSA parameter state and its operations.
//!
//! [`Rsa`] holds the eight quantities of a textbook RSA setup — message `m`,
//! ciphertext `c`, exponents `e`/`d`, modulus `n`, totient `phi` and the
//! primes `p`/`q` — each independently present or absent. Setters populate
//! the state, [`Rsa::encrypt`]/[`Rsa::decrypt`] run textbook RSA over it,
//! and the completion engine (see [`Rsa::gen_key_from`]) derives whatever is
//! missing from whatever is there.

mod cf;
mod primes;
mod recover;
mod util;

use std::io;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;

use crate::codec::{num_to_bytes, string_to_num};

use self::primes::gen_prime;
use self::util::{mod_inverse, mod_pow};

/// A (possibly partial) set of textbook RSA parameters.
///
/// Fields are addressed by one-character tags: `m`, `c`, `e`, `d`, `n`, `p`,
/// `q`, plus `t` for the totient and the auxiliary `s` for "plaintext given
/// as ASCII text". Absent fields are `None`; every present value is
/// strictly positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rsa {
    m: Option<BigUint>,
    c: Option<BigUint>,

    e: Option<BigUint>,
    d: Option<BigUint>,
    n: Option<BigUint>,

    p: Option<BigUint>,
    q: Option<BigUint>,
    phi: Option<BigUint>,
}

impl Rsa {
    /// An empty state: all fields absent.
    #[must_use]
    pub fn new() -> Rsa {
        Rsa::default()
    }

    /// Store `value` into the field addressed by `tag`.
    ///
    /// Zero values and unknown tags are no-ops: inputs are validated at this
    /// boundary so the rest of the crate can assume present fields are
    /// positive.
    pub fn set_int(&mut self, tag: char, value: BigUint) {
        if value.is_zero() {
            return;
        }

        match tag {
            'm' => self.m = Some(value),
            'c' => self.c = Some(value),
            'e' => self.e = Some(value),
            'd' => self.d = Some(value),
            'n' => self.n = Some(value),
            'p' => self.p = Some(value),
            'q' => self.q = Some(value),
            't' => self.phi = Some(value),
            _ => {}
        }
    }

    /// Store ASCII `text` through the codec. The `s` tag addresses the
    /// plaintext, so it is rewritten to `m` before storage.
    pub fn set_text(&mut self, tag: char, text: &str) {
        let tag = if tag == 's' { 'm' } else { tag };

        self.set_int(tag, string_to_num(text));
    }

    /// The field addressed by `tag`, if present. Unknown tags (including
    /// `s`) are `None`.
    #[must_use]
    pub fn get(&self, tag: char) -> Option<&BigUint> {
        match tag {
            'm' => self.m.as_ref(),
            'c' => self.c.as_ref(),
            'e' => self.e.as_ref(),
            'd' => self.d.as_ref(),
            'n' => self.n.as_ref(),
            'p' => self.p.as_ref(),
            'q' => self.q.as_ref(),
            't' => self.phi.as_ref(),
            _ => None,
        }
    }

    /// Encrypt: `c := m^e mod n`.
    ///
    /// Requires `e`, `n` and `m` to be present; returns `false` and leaves
    /// the state untouched otherwise.
    pub fn encrypt(&mut self) -> bool {
        match (&self.m, &self.e, &self.n) {
            (Some(m), Some(e), Some(n)) => {
                self.c = Some(mod_pow(m, e, n));
                true
            }
            _ => false,
        }
    }

    /// Decrypt: `m := c^d mod n`.
    ///
    /// Requires `d`, `n` and `c` to be present; returns `false` and leaves
    /// the state untouched otherwise.
    pub fn decrypt(&mut self) -> bool {
        match (&self.c, &self.d, &self.n) {
            (Some(c), Some(d), Some(n)) => {
                self.m = Some(mod_pow(c, d, n));
                true
            }
            _ => false,
        }
    }

    /// Print the fields named by `tags`, one `"<tag>: <value>"` line each.
    ///
    /// Absent fields print as `0`. The `s` tag emits the plaintext decoded
    /// back through the codec, as raw bytes (a decrypted `m` need not be
    /// text); unknown tags are skipped.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn print_fields<W: io::Write>(&self, tags: &str, out: &mut W) -> io::Result<()> {
        for tag in tags.chars() {
            match tag {
                'm' | 'c' | 'e' | 'd' | 'n' | 'p' | 'q' | 't' => {
                    let zero = BigUint::zero();
                    let value = self.get(tag).unwrap_or(&zero);

                    writeln!(out, "{}: {}", tag, value)?;
                }
                's' => {
                    let bytes = self.m.as_ref().map_or_else(Vec::new, num_to_bytes);

                    write!(out, "s: ")?;
                    out.write_all(&bytes)?;
                    writeln!(out)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Directly generate a fresh key, overwriting any key fields already
    /// present (`m` and `c` are untouched).
    ///
    /// `p` and `q` are distinct probable primes of `pq_len` digits, `e` a
    /// probable prime of `e_len` digits, `d` its normalized inverse mod
    /// `phi`.
    ///
    /// # Panics
    ///
    /// If `pq_len` or `e_len` is zero.
    pub fn gen_key<R: Rng + ?Sized>(&mut self, rng: &mut R, pq_len: usize, e_len: usize) {
        let p = gen_prime(rng, pq_len);
        let mut q = gen_prime(rng, pq_len);
        while q == p {
            q = gen_prime(rng, pq_len);
        }

        let n = &p * &q;
        let phi = (&p - BigUint::one()) * (&q - BigUint::one());

        let e = gen_prime(rng, e_len);
        let d = mod_inverse(&e, &phi);

        self.p = Some(p);
        self.q = Some(q);
        self.n = Some(n);
        self.phi = Some(phi);
        self.e = Some(e);
        self.d = Some(d);
    }
}
