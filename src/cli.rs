//! The command-line driver.
//!
//! Arguments are single tokens: `-g`/`-e`/`-d` select the mode,
//! `-iT=VALUE` sets the field with tag `T` (with `-is=TEXT` routing through
//! the ASCII codec and `-i=PATH` loading a key file), `-oATTRS[=PATH]`
//! queues an output descriptor, and `--pq-len=N`/`--e-len=N` size the
//! generated primes. Anything malformed is ignored without comment, which
//! is also what makes stray non-flag tokens harmless.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use num_bigint::BigUint;
use rand::Rng;

use crate::errors::Error;
use crate::rsa::Rsa;

/// Default decimal digits per generated prime.
const DEFAULT_PQ_LEN: usize = 200;
/// Default decimal digits for a generated public exponent.
const DEFAULT_E_LEN: usize = 5;

/// What the driver is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Generate or complete key material.
    Generate,
    /// Encrypt `m` into `c`.
    Encrypt,
    /// Decrypt `c` into `m`.
    Decrypt,
}

/// Where an output descriptor prints to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    Stdout,
    File(PathBuf),
}

/// An ordered request to print some fields to some sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub sink: OutputSink,
    /// Field tags to print, in order.
    pub attrs: String,
}

impl OutputSpec {
    fn stdout(attrs: &str) -> OutputSpec {
        OutputSpec {
            sink: OutputSink::Stdout,
            attrs: attrs.to_string(),
        }
    }
}

/// Owns an [`Rsa`] state and the run configuration parsed from argv.
#[derive(Debug)]
pub struct Driver {
    rsa: Rsa,
    mode: Option<Mode>,
    outputs: Vec<OutputSpec>,
    pq_len: usize,
    e_len: usize,
}

impl Default for Driver {
    fn default() -> Driver {
        Driver::new()
    }
}

impl Driver {
    #[must_use]
    pub fn new() -> Driver {
        Driver {
            rsa: Rsa::new(),
            mode: None,
            outputs: Vec::new(),
            pq_len: DEFAULT_PQ_LEN,
            e_len: DEFAULT_E_LEN,
        }
    }

    #[must_use]
    pub fn rsa(&self) -> &Rsa {
        &self.rsa
    }

    pub fn rsa_mut(&mut self) -> &mut Rsa {
        &mut self.rsa
    }

    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    #[must_use]
    pub fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }

    pub fn push_output(&mut self, output: OutputSpec) {
        self.outputs.push(output);
    }

    /// Parse a list of argument tokens. Pass `argv[1..]`: the program name
    /// is not an argument.
    ///
    /// Later mode flags overwrite earlier ones; everything else appends or
    /// sets in order.
    pub fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        for arg in args {
            self.parse_arg(arg.as_ref());
        }
    }

    fn parse_arg(&mut self, arg: &str) {
        let mut chars = arg.chars();

        if chars.next() != Some('-') {
            return;
        }

        // Dispatch on the second character; everything it doesn't recognize
        // falls through silently.
        match chars.next() {
            Some('g') => self.mode = Some(Mode::Generate),
            Some('e') => self.mode = Some(Mode::Encrypt),
            Some('d') => self.mode = Some(Mode::Decrypt),
            Some('i') => self.parse_input(chars.as_str()),
            Some('o') => self.parse_output(chars.as_str()),
            Some('-') => self.parse_long_option(chars.as_str()),
            _ => {}
        }
    }

    /// `rest` is everything after `-i`: either `=PATH` or `T=VALUE`.
    fn parse_input(&mut self, rest: &str) {
        if let Some(path) = rest.strip_prefix('=') {
            // Unopenable or unreadable files are skipped silently.
            let _ = self.input_from_file(Path::new(path));
            return;
        }

        let mut chars = rest.chars();
        let tag = match chars.next() {
            Some(tag) => tag,
            None => return,
        };
        if chars.next() != Some('=') {
            return;
        }

        self.set_field(tag, chars.as_str());
    }

    /// `rest` is everything after `-o`: `ATTRS` or `ATTRS=PATH`.
    fn parse_output(&mut self, rest: &str) {
        let output = match rest.split_once('=') {
            Some((attrs, path)) => OutputSpec {
                sink: OutputSink::File(PathBuf::from(path)),
                attrs: attrs.to_string(),
            },
            None => OutputSpec::stdout(rest),
        };

        self.outputs.push(output);
    }

    /// `rest` is everything after `--`: `pq-len=N` or `e-len=N`.
    fn parse_long_option(&mut self, rest: &str) {
        let (name, value) = match rest.split_once('=') {
            Some(pair) => pair,
            None => return,
        };

        let value: usize = match value.parse() {
            // Prime generation needs at least one digit, so zero-length
            // requests are as malformed as unparsable ones.
            Ok(value) if value > 0 => value,
            _ => return,
        };

        match name {
            "pq-len" => self.pq_len = value,
            "e-len" => self.e_len = value,
            _ => {}
        }
    }

    fn set_field(&mut self, tag: char, value: &str) {
        if tag == 's' {
            self.rsa.set_text(tag, value);
        } else if let Ok(value) = value.parse::<BigUint>() {
            self.rsa.set_int(tag, value);
        }
    }

    /// Load fields from a key file: one field per line, a tag character
    /// followed by two separator characters (conventionally `": "`) and the
    /// value. Blank and malformed lines are skipped.
    ///
    /// # Errors
    ///
    /// If the file cannot be read.
    pub fn input_from_file(&mut self, path: &Path) -> io::Result<()> {
        let contents = fs::read_to_string(path)?;

        for line in contents.lines() {
            let mut chars = line.chars();
            let tag = match chars.next() {
                Some(tag) => tag,
                None => continue,
            };

            // Skip the two separator characters after the tag.
            chars.next();
            chars.next();

            self.set_field(tag, chars.as_str());
        }

        Ok(())
    }

    /// Run the selected mode over the state.
    ///
    /// Generation always succeeds and reports which fields came from random
    /// bits on standard output. Encrypt and decrypt install their default
    /// output descriptor (`c` and `m` respectively, to standard output) when
    /// none was requested.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMode`] when no mode was selected;
    /// [`Error::InsufficientInput`] when the operation's inputs are missing.
    /// No output is produced on error.
    pub fn evaluate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), Error> {
        match self.mode {
            Some(Mode::Generate) => {
                let rand_gen = self.rsa.gen_key_from(rng, self.pq_len, self.e_len);

                if rand_gen.is_empty() {
                    println!("Generated randomly: (none)");
                } else {
                    println!("Generated randomly: {}", rand_gen);
                }

                self.write_outputs();
                Ok(())
            }
            Some(Mode::Encrypt) => {
                if !self.rsa.encrypt() {
                    return Err(Error::InsufficientInput);
                }

                if self.outputs.is_empty() {
                    self.outputs.push(OutputSpec::stdout("c"));
                }

                self.write_outputs();
                Ok(())
            }
            Some(Mode::Decrypt) => {
                if !self.rsa.decrypt() {
                    return Err(Error::InsufficientInput);
                }

                if self.outputs.is_empty() {
                    self.outputs.push(OutputSpec::stdout("m"));
                }

                self.write_outputs();
                Ok(())
            }
            None => Err(Error::InvalidMode),
        }
    }

    /// Honor the output descriptors in order. Sinks that cannot be opened
    /// or written are skipped; the rest still print.
    fn write_outputs(&self) {
        for output in &self.outputs {
            match &output.sink {
                OutputSink::Stdout => {
                    let stdout = io::stdout();
                    let _ = self.rsa.print_fields(&output.attrs, &mut stdout.lock());
                }
                OutputSink::File(path) => {
                    let mut file = match File::create(path) {
                        Ok(file) => file,
                        Err(_) => continue,
                    };

                    let _ = self.rsa.print_fields(&output.attrs, &mut file);
                }
            }
        }
    }
}
