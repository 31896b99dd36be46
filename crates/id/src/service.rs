//! Internal implementation of the LifeKey identifier type.

use crate::{IdError, IdResult};
use rand::Rng;
use std::{fmt, str::FromStr};

/// Literal prefix carried by every LifeKey identifier.
pub const ID_PREFIX: &str = "LK-";

/// Number of random characters following [`ID_PREFIX`].
pub const ID_SUFFIX_LEN: usize = 8;

/// Characters the random suffix is drawn from.
pub const ID_SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A LifeKey identifier in canonical form (`LK-` + 8 uppercase alphanumerics).
///
/// Once constructed, the contained string is guaranteed canonical, so it can be
/// compared byte-for-byte against stored identifiers.
///
/// # Construction
/// - [`LifeKeyId::mint`] generates a fresh identifier.
/// - [`LifeKeyId::parse`] normalises and validates an externally supplied one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LifeKeyId(String);

impl LifeKeyId {
    /// Mints a new identifier with a random suffix.
    ///
    /// This never fails and has no side effects.
    pub fn mint() -> Self {
        let mut rng = rand::thread_rng();
        let mut id = String::with_capacity(ID_PREFIX.len() + ID_SUFFIX_LEN);
        id.push_str(ID_PREFIX);
        for _ in 0..ID_SUFFIX_LEN {
            let idx = rng.gen_range(0..ID_SUFFIX_ALPHABET.len());
            id.push(char::from(ID_SUFFIX_ALPHABET[idx]));
        }
        Self(id)
    }

    /// Normalises and validates a candidate identifier.
    ///
    /// The input is trimmed and uppercased before validation, tolerating the case
    /// variance introduced by scanners, OCR and manual entry.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if the normalised input is not canonical.
    pub fn parse(input: &str) -> IdResult<Self> {
        let normalised = input.trim().to_ascii_uppercase();
        if Self::is_canonical(&normalised) {
            return Ok(Self(normalised));
        }
        Err(IdError::InvalidInput(format!(
            "LifeKey ID must be '{}' followed by {} letters or digits, got: '{}'",
            ID_PREFIX, ID_SUFFIX_LEN, input
        )))
    }

    /// Returns true if `input` is already in canonical form.
    ///
    /// This is a purely syntactic check and does not normalise case.
    pub fn is_canonical(input: &str) -> bool {
        match input.strip_prefix(ID_PREFIX) {
            Some(suffix) => {
                suffix.len() == ID_SUFFIX_LEN
                    && suffix
                        .bytes()
                        .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9'))
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the random part of the identifier, without the prefix.
    pub fn suffix(&self) -> &str {
        &self.0[ID_PREFIX.len()..]
    }
}

impl fmt::Display for LifeKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LifeKeyId {
    type Err = IdError;

    /// Equivalent to [`LifeKeyId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifeKeyId::parse(s)
    }
}

impl AsRef<str> for LifeKeyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for LifeKeyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LifeKeyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LifeKeyId::parse(&s).map_err(serde::de::Error::custom)
    }
}
