// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use rand::RngCore;
use std::fs;
use std::path::Path;

use crate::errors::LedgerError;

const PREFIX: &str = "enc1:";
const NONCE_LEN: usize = 12;

/// Codec for confidential columns, applied at the store boundary only.
/// On-disk form is `enc1:<base64(nonce || ciphertext)>` (AES-256-GCM);
/// anything without the prefix passes through untouched.
pub struct FieldVault {
    cipher: Aes256Gcm,
}

impl FieldVault {
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Load the key file next to the database, creating it on first use.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        let key: [u8; 32] = if path.exists() {
            let bytes =
                fs::read(path).with_context(|| format!("Read key file {}", path.display()))?;
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| anyhow::anyhow!("Key file {} is corrupt", path.display()))?
        } else {
            let mut key = [0u8; 32];
            rand::thread_rng().fill_bytes(&mut key);
            fs::write(path, key).with_context(|| format!("Write key file {}", path.display()))?;
            key
        };
        Ok(Self::new(&key))
    }

    /// A value already in encrypted form is returned unchanged.
    pub fn encrypt(&self, plain: &str) -> std::result::Result<String, LedgerError> {
        if plain.starts_with(PREFIX) {
            return Ok(plain.to_string());
        }
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plain.as_bytes())
            .map_err(|e| LedgerError::Crypto(e.to_string()))?;
        let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(&ciphertext);
        Ok(format!("{}{}", PREFIX, B64.encode(buf)))
    }

    /// A read never fails: values that cannot be decrypted degrade to the raw
    /// stored form with a logged warning.
    pub fn decrypt(&self, stored: &str) -> String {
        if !stored.starts_with(PREFIX) {
            return stored.to_string();
        }
        match self.try_decrypt(stored) {
            Some(plain) => plain,
            None => {
                tracing::warn!("field value failed to decrypt, returning stored form");
                stored.to_string()
            }
        }
    }

    /// True when `decrypt` would yield plaintext (or the value was never
    /// encrypted). Used by the doctor scan.
    pub fn can_decrypt(&self, stored: &str) -> bool {
        !stored.starts_with(PREFIX) || self.try_decrypt(stored).is_some()
    }

    fn try_decrypt(&self, stored: &str) -> Option<String> {
        let raw = B64.decode(&stored[PREFIX.len()..]).ok()?;
        if raw.len() < NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .ok()?;
        String::from_utf8(plain).ok()
    }
}
