pub mod alphabet;
mod error;
pub mod generator;
pub mod kdf;

pub use alphabet::{Alphabet, CharClass};
pub use error::{Error, Result};
pub use generator::{
    DEFAULT_LENGTH, MIN_LENGTH, MaxLength, NATURAL_LENGTH, derive, derive_with,
};
pub use kdf::Version;
