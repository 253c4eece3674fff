//! Character Domain — Roster Entities and Store Keys
//!
//! A character is a plain `{name, class, level}` record. Its identity
//! lives only in the store key (`char:<nanos>`), never in the value.
//!
//! Exposes:
//! - `Character` and its JSON record codec
//! - `CharacterKey` + `KeyMinter` for key construction
//! - `parse_level` for the one validation rule the roster enforces

use std::fmt;
use std::num::ParseIntError;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key namespace separating character records from anything else in the store.
pub const CHARACTER_NAMESPACE: &str = "char:";

/// A roster character as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: String,
    pub level: i64,
}

impl Character {
    /// Build a character from raw form input.
    ///
    /// Name and class are taken as-is (empty is fine); only the level
    /// must be an integer.
    pub fn from_form(
        name: impl Into<String>,
        class: impl Into<String>,
        level_text: &str,
    ) -> Result<Self, InvalidLevel> {
        Ok(Self {
            name: name.into(),
            class: class.into(),
            level: parse_level(level_text)?,
        })
    }

    /// Serialize to the stored JSON record.
    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        serde_json::to_vec(self).map_err(RecordError::Encode)
    }

    /// Decode a stored JSON record.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        serde_json::from_slice(bytes).map_err(RecordError::Decode)
    }
}

/// Level text that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("level must be a number, got {input:?}")]
pub struct InvalidLevel {
    pub input: String,
    #[source]
    pub source: ParseIntError,
}

/// Parse a level the way the form submits it: optional sign, digits only.
pub fn parse_level(text: &str) -> Result<i64, InvalidLevel> {
    text.parse::<i64>().map_err(|source| InvalidLevel {
        input: text.to_string(),
        source,
    })
}

/// Failure to move a character in or out of its stored form.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("failed to encode character record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode character record: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Store key for a single character: `char:<nanoseconds since epoch>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterKey(i64);

impl CharacterKey {
    /// Timestamp component of the key.
    pub fn nanos(self) -> i64 {
        self.0
    }

    /// Parse a full store key back into a `CharacterKey`.
    ///
    /// Returns `None` for keys outside the namespace or with a
    /// non-numeric suffix.
    pub fn parse(key: &str) -> Option<Self> {
        key.strip_prefix(CHARACTER_NAMESPACE)?
            .parse()
            .ok()
            .map(Self)
    }
}

impl fmt::Display for CharacterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CHARACTER_NAMESPACE}{}", self.0)
    }
}

/// Mints character keys from the wall clock.
///
/// Keys are strictly increasing within one minter: if the clock returns
/// a timestamp at or behind the last one issued (coarse resolution, clock
/// step back), the previous value plus one is used instead. Two separate
/// processes can still collide; nothing coordinates across them.
#[derive(Debug, Default)]
pub struct KeyMinter {
    last: AtomicI64,
}

impl KeyMinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next key using the current UTC time.
    pub fn mint(&self) -> CharacterKey {
        self.mint_at(now_nanos())
    }

    /// Mint the next key given an observed clock reading.
    pub fn mint_at(&self, observed: i64) -> CharacterKey {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = observed.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return CharacterKey(next),
                Err(current) => last = current,
            }
        }
    }
}

fn now_nanos() -> i64 {
    let now = Utc::now();
    // Out of range only past year 2262; fall back to microsecond precision.
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
}
