//! Canonical seeds and the deterministic byte streams derived from them.

use crate::alphabet::Alphabet;
use blake2::Blake2b512;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

const DIGEST_LEN: usize = 32;
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEYSTREAM_BUFFER_LEN: usize = 1024;

/// Derivation algorithm version.
///
/// A version fixes the seed encoding, the digest, the extension strategy,
/// the sampling rule and the alphabet. Released versions never change;
/// a different scheme gets a new variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Version {
    /// SHA-256 hash chain, modulo mapping onto [`Alphabet::V1`].
    #[default]
    V1,
    /// BLAKE2b-keyed ChaCha20 keystream, rejection sampling onto [`Alphabet::V2`].
    V2,
}

impl Version {
    /// Stable identifier, also used as the domain tag of the canonical seed.
    pub const fn identifier(self) -> &'static str {
        match self {
            Version::V1 => "passgen:v1",
            Version::V2 => "passgen:v2",
        }
    }

    pub const fn alphabet(self) -> Alphabet {
        match self {
            Version::V1 => Alphabet::V1,
            Version::V2 => Alphabet::V2,
        }
    }

    pub const fn digest_name(self) -> &'static str {
        match self {
            Version::V1 => "SHA-256 chain",
            Version::V2 => "BLAKE2b + ChaCha20",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Encodes `components` into the single seed that gets hashed.
///
/// Each component is framed by its byte length, so no two distinct
/// sequences share a seed and component content is never altered.
pub fn canonical_seed<S: AsRef<str>>(version: Version, components: &[S]) -> Zeroizing<Vec<u8>> {
    let tag = version.identifier().as_bytes();
    let body: usize = components.iter().map(|c| 8 + c.as_ref().len()).sum();

    let mut seed = Zeroizing::new(Vec::with_capacity(tag.len() + body));
    seed.extend_from_slice(tag);
    for component in components {
        let bytes = component.as_ref().as_bytes();
        seed.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
        seed.extend_from_slice(bytes);
    }
    seed
}

/// An endless, deterministic sequence of bytes.
pub trait ByteSource {
    fn next_byte(&mut self) -> u8;
}

/// SHA-256 of the seed, extended by hashing each block to get the next.
pub struct HashChain {
    block: Zeroizing<[u8; DIGEST_LEN]>,
    pos: usize,
}

impl HashChain {
    pub fn new(seed: &[u8]) -> Self {
        Self {
            block: Zeroizing::new(Sha256::digest(seed).into()),
            pos: 0,
        }
    }
}

impl ByteSource for HashChain {
    fn next_byte(&mut self) -> u8 {
        if self.pos >= DIGEST_LEN {
            let next: [u8; DIGEST_LEN] = Sha256::digest(&self.block[..]).into();
            *self.block = next;
            self.pos = 0;
        }

        let byte = self.block[self.pos];
        self.pos += 1;
        byte
    }
}

/// ChaCha20 keystream keyed by the first half of BLAKE2b-512 of the seed.
pub struct Keystream {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl Keystream {
    pub fn new(seed: &[u8]) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(seed);
        let mut digest = hasher.finalize();

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&digest[..KEY_LEN]);
        digest.as_mut_slice().zeroize();

        Self::from_key(&key)
    }

    fn from_key(key: &[u8; KEY_LEN]) -> Self {
        let mut cipher = ChaCha20::new(key.into(), &[0u8; NONCE_LEN].into());
        let mut buffer = Zeroizing::new(vec![0u8; KEYSTREAM_BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }
}

impl ByteSource for Keystream {
    fn next_byte(&mut self) -> u8 {
        if self.pos >= self.buffer.len() {
            // The buffer must be zero before applying or the old keystream leaks in.
            self.buffer.fill(0);
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let byte = self.buffer[self.pos];
        self.pos += 1;
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn take<S: ByteSource>(source: &mut S, n: usize) -> Vec<u8> {
        (0..n).map(|_| source.next_byte()).collect()
    }

    #[test]
    fn test_canonical_seed_layout() {
        let seed = canonical_seed(Version::V1, &["ab", "c"]);
        assert_eq!(
            hex(&seed),
            "7061737367656e3a763100000000000000026162000000000000000163"
        );
    }

    #[test]
    fn test_canonical_seed_framing_prevents_collisions() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["ab", "c"], vec!["a", "bc"]),
            (vec!["abc"], vec!["ab", "c"]),
            (vec!["site", ""], vec!["site"]),
            (vec!["a", "b"], vec!["b", "a"]),
            (vec!["a\u{1f}b"], vec!["a", "b"]),
        ];

        for (left, right) in cases {
            assert_ne!(
                *canonical_seed(Version::V1, &left),
                *canonical_seed(Version::V1, &right),
                "{:?} and {:?} share a seed",
                left,
                right
            );
        }
    }

    #[test]
    fn test_canonical_seed_keeps_input_verbatim() {
        let plain = canonical_seed(Version::V1, &["Paris"]);
        let padded = canonical_seed(Version::V1, &[" Paris "]);
        let lower = canonical_seed(Version::V1, &["paris"]);
        let nfc = canonical_seed(Version::V1, &["Par\u{00ed}s"]);
        let nfd = canonical_seed(Version::V1, &["Pari\u{0301}s"]);

        assert_ne!(*plain, *padded);
        assert_ne!(*plain, *lower);
        assert_ne!(*nfc, *nfd);
    }

    #[test]
    fn test_canonical_seed_domain_separated() {
        assert_ne!(
            *canonical_seed(Version::V1, &["example.com"]),
            *canonical_seed(Version::V2, &["example.com"])
        );
    }

    #[test]
    fn test_hash_chain_blocks() {
        let mut chain = HashChain::new(b"abc");

        let first = take(&mut chain, 32);
        assert_eq!(
            hex(&first),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let second = take(&mut chain, 32);
        assert_eq!(hex(&second), hex(&Sha256::digest(&first)));
        assert_ne!(first, second);
    }

    #[test]
    fn test_keystream_rfc7539_vector() {
        let mut stream = Keystream::from_key(&[0u8; KEY_LEN]);
        let block = take(&mut stream, 64);
        assert_eq!(
            hex(&block),
            "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
             da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586"
        );
    }

    #[test]
    fn test_keystream_from_seed() {
        let seed = canonical_seed(Version::V2, &["example.com"]);
        let mut stream = Keystream::new(&seed);
        assert_eq!(
            hex(&take(&mut stream, 16)),
            "485fa944c4e06e6c825d78e61c23708a"
        );
    }

    #[test]
    fn test_keystream_continues_across_refill() {
        let seed = canonical_seed(Version::V2, &["example.com"]);
        let mut stream = Keystream::new(&seed);
        take(&mut stream, KEYSTREAM_BUFFER_LEN);
        assert_eq!(hex(&take(&mut stream, 8)), "f7a4f6b0d1a04b59");
    }

    #[test]
    fn test_streams_deterministic() {
        let seed = canonical_seed(Version::V1, &["example.com", "fluffy"]);

        let mut a = HashChain::new(&seed);
        let mut b = HashChain::new(&seed);
        assert_eq!(take(&mut a, 100), take(&mut b, 100));

        let mut a = Keystream::new(&seed);
        let mut b = Keystream::new(&seed);
        assert_eq!(take(&mut a, 2000), take(&mut b, 2000));
    }

    #[test]
    fn test_version_identifiers() {
        assert_eq!(Version::default(), Version::V1);
        assert_eq!(Version::V1.to_string(), "passgen:v1");
        assert_eq!(Version::V2.to_string(), "passgen:v2");
        assert_eq!(Version::V1.alphabet(), Alphabet::V1);
        assert_eq!(Version::V2.alphabet(), Alphabet::V2);
    }
}
