// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors surfaced by the ledger and store layers. The CLI wraps these in
/// `anyhow` with user-facing context.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    Validation(String),

    /// Id missing, or owned by a different profile. The two cases are
    /// indistinguishable on purpose.
    #[error("record not found")]
    NotFound,

    #[error("loan is already settled")]
    AlreadySettled,

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
