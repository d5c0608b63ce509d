//! A pedagogical [RSA](https://en.wikipedia.org/wiki/RSA_(cryptosystem)) toolkit.
//!
//! Generates RSA key material, encrypts and decrypts integer-encoded
//! messages, and — given a partial set of RSA parameters — reconstructs the
//! remaining ones, first through algebraic identities and then through
//! [Wiener's attack](https://en.wikipedia.org/wiki/Wiener%27s_attack) on
//! small private exponents.
//!
//! This is **not** a crypto library _(don't roll your own crypto!)_: there is
//! no padding, no message chunking, no side-channel hardening, and primes are
//! only probable. It is a teaching tool for the arithmetic underneath RSA.

#![deny(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::use_self)] // Not sure about this :/
#![allow(clippy::doc_markdown)] // Too many false positives, not very smart
#![allow(clippy::module_name_repetitions)] // Anti-pattern IMHO
#![allow(clippy::many_single_char_names)] // This is a math crate, names come from the math

pub mod cli;
pub mod codec;
pub mod errors;
pub mod rsa;
