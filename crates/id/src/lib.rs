//! LifeKey identifier utilities.
//!
//! Every patient record is keyed by a *LifeKey identifier*: a short, self-describing
//! string intended to be printed on a card, embedded in a QR code, or read out over
//! the phone by a responder.
//!
//! ## Canonical form
//! - Prefix: the literal `LK-`
//! - Suffix: exactly 8 characters from `A-Z` and `0-9`
//! - Example: `LK-A1B2C3D4`
//!
//! Notes:
//! - The prefix lets a scanner or lookup screen tell a LifeKey identifier apart from
//!   arbitrary scanned text before any query is issued.
//! - Input from people and scanners is normalised before validation: surrounding
//!   whitespace is trimmed and letters are uppercased, so `lk-a1b2c3d4` parses.
//! - Minting draws the suffix from a non-cryptographic thread RNG. Identifiers are
//!   lookup keys, not secrets. Uniqueness against stored records is the record
//!   store's job, not the minter's.

mod service;

pub use service::{LifeKeyId, ID_PREFIX, ID_SUFFIX_ALPHABET, ID_SUFFIX_LEN};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
