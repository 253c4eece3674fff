//! Roster Use Case - Character Creation and Listing
//!
//! Creation validates the level, mints a fresh key, and performs one
//! store write. Listing enumerates the `char:` namespace and reads every
//! record, keeping whatever decodes: a single unreadable record is
//! logged and skipped so the rest of the roster stays visible. Only a
//! failed enumeration aborts the listing.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::character::{
    CHARACTER_NAMESPACE, Character, InvalidLevel, KeyMinter, RecordError,
};
use crate::ports::store::KeyValueStore;

/// Failures surfaced to roster callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Level text is not an integer. Nothing was written.
    #[error(transparent)]
    InvalidLevel(#[from] InvalidLevel),
    /// Character could not be serialized.
    #[error(transparent)]
    Encode(RecordError),
    /// The store rejected the write.
    #[error("failed to save character: {0:#}")]
    StoreWrite(#[source] anyhow::Error),
    /// The key scan itself failed; no partial listing is returned.
    #[error("failed to enumerate characters: {0:#}")]
    StoreEnumeration(#[source] anyhow::Error),
}

/// Why one listed record was dropped.
#[derive(Debug, Error)]
enum SkippedRecord {
    #[error("fetch failed: {0:#}")]
    Fetch(anyhow::Error),
    #[error("key vanished between scan and fetch")]
    Missing,
    #[error(transparent)]
    Corrupt(#[from] RecordError),
}

/// Character roster over a key-value store.
pub struct CharacterService {
    /// Store port.
    store: Arc<dyn KeyValueStore>,
    /// Key source for new characters.
    keys: KeyMinter,
}

impl CharacterService {
    /// Create a roster backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            keys: KeyMinter::new(),
        }
    }

    /// Validate and persist a new character from form input.
    #[instrument(skip(self, name, class))]
    pub async fn create(
        &self,
        name: &str,
        class: &str,
        level_text: &str,
    ) -> Result<Character, ServiceError> {
        let character = Character::from_form(name, class, level_text)?;
        let record = character.encode().map_err(ServiceError::Encode)?;
        let key = self.keys.mint();

        self.store
            .set(&key.to_string(), &record)
            .await
            .map_err(|e| {
                error!(key = %key, error = %e, "Failed to save character");
                ServiceError::StoreWrite(e)
            })?;

        info!(key = %key, class = %character.class, level = character.level, "Character created");
        Ok(character)
    }

    /// Read every character in the namespace, skipping unreadable records.
    ///
    /// Order follows the store's key enumeration and is unspecified.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Character>, ServiceError> {
        let keys = self
            .store
            .keys(CHARACTER_NAMESPACE)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to enumerate characters");
                ServiceError::StoreEnumeration(e)
            })?;

        let mut characters = Vec::with_capacity(keys.len());
        let mut skipped = 0usize;

        for key in &keys {
            match self.load(key).await {
                Ok(character) => characters.push(character),
                Err(e) => {
                    skipped += 1;
                    warn!(key = %key, error = %e, "Skipping unreadable character record");
                }
            }
        }

        debug!(listed = characters.len(), skipped, "Characters listed");
        Ok(characters)
    }

    async fn load(&self, key: &str) -> Result<Character, SkippedRecord> {
        let bytes = self
            .store
            .get(key)
            .await
            .map_err(SkippedRecord::Fetch)?
            .ok_or(SkippedRecord::Missing)?;
        Ok(Character::decode(&bytes)?)
    }

    /// Check that the backing store answers.
    pub async fn store_ready(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Store ping failed");
                false
            }
        }
    }
}
