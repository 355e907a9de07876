//! Session state machine and its single owner.
//!
//! All session mutation happens here, and every in-memory mutation is
//! immediately paired with the matching persistence write or delete before
//! the call returns.

use explanner_model::{AccessClaims, CredentialPair};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use super::errors::StorageError;
use super::storage::SessionStorage;
use super::token::decode_access_claims;

/// Authentication state machine.
#[derive(Debug, Clone)]
pub enum Session {
    /// No authenticated user.
    Unauthenticated,

    /// A credential pair is live and its identity claims are decoded.
    Authenticated {
        pair: CredentialPair,
        identity: AccessClaims,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn identity(&self) -> Option<&AccessClaims> {
        match self {
            Session::Authenticated { identity, .. } => Some(identity),
            Session::Unauthenticated => None,
        }
    }

    pub fn pair(&self) -> Option<&CredentialPair> {
        match self {
            Session::Authenticated { pair, .. } => Some(pair),
            Session::Unauthenticated => None,
        }
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.pair().map(|pair| pair.refresh.as_str())
    }
}

/// Single source of truth for the current [`Session`].
///
/// State is published over a watch channel for lock-free reads and change
/// subscriptions. The epoch counter increments on every mutation; an async
/// operation that captured the epoch before going to the network can tell
/// on completion whether the session it was issued for still exists.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Session>>,
    receiver: watch::Receiver<Session>,
    storage: Arc<SessionStorage>,
    epoch: Arc<AtomicU64>,
}

impl SessionStore {
    pub fn new(storage: SessionStorage) -> Self {
        let (sender, receiver) = watch::channel(Session::Unauthenticated);
        Self {
            sender: Arc::new(sender),
            receiver,
            storage: Arc::new(storage),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Rehydrates the session from the persisted record.
    ///
    /// Fails soft: a missing, unreadable, or malformed record (including an
    /// access token that no longer decodes) leaves the session empty without
    /// surfacing an error. Stale records are removed so the next startup
    /// starts clean.
    pub async fn initialize(&self) {
        let pair = match self.storage.load().await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                log::debug!("No persisted session found");
                return;
            }
            Err(e) => {
                log::warn!("Ignoring unreadable persisted session: {}", e);
                let _ = self.storage.clear().await;
                return;
            }
        };

        match decode_access_claims(&pair.access) {
            Ok(identity) => {
                log::info!(
                    "Restored session for {}",
                    identity.sub.as_deref().unwrap_or("<unknown>")
                );
                self.publish(Session::Authenticated { pair, identity });
            }
            Err(e) => {
                log::warn!("Persisted access token no longer decodes: {}", e);
                let _ = self.storage.clear().await;
            }
        }
    }

    /// Replaces the credential pair, re-derives identity, and persists.
    ///
    /// The backend is trusted to issue well-formed tokens; an undecodable
    /// access token here is a broken contract, not a user-facing error.
    pub async fn set(&self, pair: CredentialPair) -> Result<(), StorageError> {
        let identity = decode_access_claims(&pair.access)
            .expect("backend issued an undecodable access token");
        let result = self.storage.save(&pair).await;
        self.publish(Session::Authenticated { pair, identity });
        result
    }

    /// Applies [`SessionStore::set`] only if the session epoch still equals
    /// `epoch`. Returns whether the pair was applied.
    ///
    /// This is the completion guard for refresh responses: one that resolves
    /// after a logout (or after a newer login) must be discarded, not revive
    /// the session it was issued for. The epoch is re-checked after the
    /// persistence write, which is the one suspension point where a clear
    /// can interleave.
    pub async fn set_if_current(
        &self,
        epoch: u64,
        pair: CredentialPair,
    ) -> Result<bool, StorageError> {
        if self.epoch() != epoch {
            log::debug!("Discarding credential pair issued for a stale session");
            return Ok(false);
        }

        let identity = decode_access_claims(&pair.access)
            .expect("backend issued an undecodable access token");
        let save_result = self.storage.save(&pair).await;

        if self.epoch() != epoch {
            // The session was cleared while the write was in flight; the
            // record on disk must match the (empty) live session again.
            log::debug!("Discarding credential pair issued for a stale session");
            let _ = self.storage.clear().await;
            return Ok(false);
        }

        self.publish(Session::Authenticated { pair, identity });
        save_result.map(|()| true)
    }

    /// Empties the session and deletes the persisted record. Idempotent.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let result = self.storage.clear().await;
        self.publish(Session::Unauthenticated);
        result
    }

    fn publish(&self, session: Session) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        // Ignore send errors (no receivers).
        let _ = self.sender.send(session);
    }

    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_authenticated()
    }

    /// Access state without cloning.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.receiver.borrow())
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.receiver.clone()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}
