// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin session: the single mutable slot holding the bearer token.
//!
//! The session is constructed once at startup and shared by handle; nothing
//! else in the crate keeps token state. The token is mirrored to an optional
//! token file so it survives restarts, the way the original single
//! per-origin storage key survived page reloads. There is no expiry
//! tracking: a stored token is treated as valid until Garmin rejects it or
//! the user logs out.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;

/// Bytes of entropy in the OAuth anti-forgery state token.
const STATE_LEN: usize = 24;

#[derive(Debug, Default)]
struct Inner {
    /// Current bearer token, if authenticated.
    access_token: Option<String>,
    /// State value generated for an authorization redirect that has not
    /// returned yet. Consumed (single-use) by the callback.
    pending_state: Option<String>,
}

/// Shared session handle.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<Inner>>,
    token_file: Option<PathBuf>,
}

impl Session {
    /// Create a session backed by a token file, loading any persisted token.
    pub fn load(token_file: Option<&str>) -> Self {
        let token_file = token_file.map(PathBuf::from);

        let access_token = token_file.as_deref().and_then(|path| {
            match std::fs::read_to_string(path) {
                Ok(s) if !s.trim().is_empty() => {
                    tracing::info!(path = %path.display(), "Loaded persisted access token");
                    Some(s.trim().to_string())
                }
                Ok(_) => None,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read token file");
                    None
                }
            }
        });

        Self {
            inner: Arc::new(RwLock::new(Inner {
                access_token,
                pending_state: None,
            })),
            token_file,
        }
    }

    /// Create an in-memory session with no durable backing (tests).
    pub fn in_memory() -> Self {
        Self::load(None)
    }

    /// True iff an access token is present. No network call is made.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.access_token.is_some()
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.inner.read().await.access_token.clone()
    }

    /// Store a freshly exchanged token in memory and in the token file.
    ///
    /// A failed file write is logged and otherwise ignored; memory is
    /// authoritative for the lifetime of the process.
    pub async fn store_token(&self, token: &str) {
        self.inner.write().await.access_token = Some(token.to_string());

        if let Some(path) = &self.token_file {
            if let Err(e) = std::fs::write(path, token) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to persist access token");
            }
        }
    }

    /// Clear the token from memory and delete the token file.
    pub async fn clear(&self) {
        self.inner.write().await.access_token = None;

        if let Some(path) = &self.token_file {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to delete token file")
                }
            }
        }
    }

    /// Generate a fresh anti-forgery state token and remember it as pending.
    ///
    /// Each call regenerates the value; only the most recent one is accepted
    /// on return, and only once.
    pub async fn begin_authorization(&self) -> Result<String, AppError> {
        let mut buf = [0u8; STATE_LEN];
        SystemRandom::new()
            .fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        let state = URL_SAFE_NO_PAD.encode(buf);

        self.inner.write().await.pending_state = Some(state.clone());
        Ok(state)
    }

    /// Compare a returned state value against the pending one, consuming it.
    ///
    /// Returns false if no authorization is pending or the value differs.
    /// The pending state is cleared either way, so a replayed callback can
    /// never match twice.
    pub async fn consume_state(&self, returned: &str) -> bool {
        let pending = self.inner.write().await.pending_state.take();
        match pending {
            Some(expected) => expected == returned,
            None => false,
        }
    }
}
