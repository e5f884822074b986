use crate::alphabet::{Alphabet, CLASS_COUNT, CharClass};
use crate::error::{Error, Result};
use crate::kdf::{ByteSource, HashChain, Keystream, Version, canonical_seed};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 15;

/// Shortest length that still fits one character of every class.
pub const MIN_LENGTH: usize = CLASS_COUNT;

/// Number of characters produced before truncation.
pub const NATURAL_LENGTH: usize = 128;

/// Upper bound on the length of the derived password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaxLength(usize);

impl MaxLength {
    pub const DEFAULT: Self = Self(DEFAULT_LENGTH);

    pub fn new(value: i64) -> Result<Self> {
        if value < MIN_LENGTH as i64 {
            return Err(Error::InvalidLength(value.to_string()));
        }
        Ok(Self(usize::try_from(value).unwrap_or(usize::MAX)))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Length of the password this bound produces.
    pub fn output_len(self) -> usize {
        self.0.min(NATURAL_LENGTH)
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for MaxLength {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for MaxLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(value) => Self::new(value),
            // Too large for i64 is still a valid bound; it gets capped like any other.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(Self(usize::MAX)),
            Err(_) => Err(Error::InvalidLength(s.to_string())),
        }
    }
}

impl fmt::Display for MaxLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives the password for `components` with the default algorithm version.
///
/// The first component identifies the site and must not be blank. Any
/// further components are answers to personal questions; their order
/// matters.
///
/// ```
/// let password = passgen::derive(&["example.com"], 15).unwrap();
/// assert_eq!(password.len(), 15);
/// ```
pub fn derive<S: AsRef<str>>(components: &[S], max_length: i64) -> Result<Zeroizing<String>> {
    derive_with(Version::default(), components, MaxLength::new(max_length)?)
}

/// Derives the password for `components` with an explicit algorithm version.
pub fn derive_with<S: AsRef<str>>(
    version: Version,
    components: &[S],
    max_length: MaxLength,
) -> Result<Zeroizing<String>> {
    match components.first() {
        Some(site) if !site.as_ref().trim().is_empty() => {}
        _ => return Err(Error::EmptyPhrase),
    }

    let seed = canonical_seed(version, components);
    let password_length = max_length.output_len();

    let password_bytes = match version {
        Version::V1 => generate(&mut HashChain::new(&seed), version, password_length),
        Version::V2 => generate(&mut Keystream::new(&seed), version, password_length),
    };

    let mut password = Zeroizing::new(String::with_capacity(password_length));
    password.extend(password_bytes.iter().map(|&ch| ch as char));

    Ok(password)
}

fn generate<S: ByteSource>(
    source: &mut S,
    version: Version,
    password_length: usize,
) -> Zeroizing<Vec<u8>> {
    let alphabet = version.alphabet();
    let characters = alphabet.characters();

    let mut password_bytes = Zeroizing::new(Vec::with_capacity(password_length));
    while password_bytes.len() < password_length {
        let index = sample(source, version, characters.len());
        password_bytes.push(characters[index]);
    }

    enforce_class_diversity(source, version, &alphabet, &mut password_bytes);

    password_bytes
}

/// Draws an index below `bound` from the stream.
fn sample<S: ByteSource>(source: &mut S, version: Version, bound: usize) -> usize {
    debug_assert!(bound > 0 && bound <= 256);

    match version {
        Version::V1 => source.next_byte() as usize % bound,
        Version::V2 => {
            let rejection_threshold = 256 - (256 % bound);
            loop {
                let random_byte = source.next_byte() as usize;
                if random_byte < rejection_threshold {
                    return random_byte % bound;
                }
            }
        }
    }
}

/// Puts one character of every missing class into `password_bytes`.
///
/// The replaced position is found by scanning forward from a position drawn
/// from the stream, skipping characters whose class occurs only once.
fn enforce_class_diversity<S: ByteSource>(
    source: &mut S,
    version: Version,
    alphabet: &Alphabet,
    password_bytes: &mut [u8],
) {
    let len = password_bytes.len();
    if len < CLASS_COUNT {
        return;
    }

    for class in CharClass::ALL {
        let counts = Alphabet::class_counts(password_bytes);
        if Alphabet::count_of(&counts, class) > 0 {
            continue;
        }

        let start = sample(source, version, len);
        let Some(pos) = (start..len)
            .chain(0..start)
            .find(|&p| Alphabet::count_of(&counts, CharClass::of(password_bytes[p])) >= 2)
        else {
            continue;
        };

        let members = alphabet.members(class);
        password_bytes[pos] = members[sample(source, version, members.len())];
    }
}
