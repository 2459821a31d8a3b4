// task-client/src/session_guard.rs
use common::models::credential::Credential;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::credential_store::CredentialStore;

/// Derived session state; never stored on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// What the gateway captures right before sending a request
pub struct SessionSnapshot {
    pub generation: u64,
    pub credential: Option<Credential>,
}

/// Sole authority over session transitions.
///
/// Every transition bumps a generation counter. Work started under one
/// generation can check whether the session it ran under still exists.
pub struct SessionGuard {
    store: Arc<CredentialStore>,
    generation: AtomicU64,
    state_tx: watch::Sender<SessionState>,
    transition: Mutex<()>,
}

impl SessionGuard {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        let initial = if store.is_present() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        tracing::info!("Session guard starting in {:?} state", initial);

        let (state_tx, _) = watch::channel(initial);
        Self {
            store,
            generation: AtomicU64::new(0),
            state_tx,
            transition: Mutex::new(()),
        }
    }

    /// Record a freshly issued credential. This is the only path that
    /// writes a present credential.
    pub fn establish(&self, credential: Credential) {
        let _lock = self.lock();
        self.store.set(&credential);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_replace(SessionState::Authenticated);

        tracing::info!(
            "Session established for user {} (generation {})",
            credential.subject().id,
            generation
        );
    }

    /// Drop the current session. Calling this while anonymous is a no-op.
    pub fn invalidate(&self) {
        let _lock = self.lock();
        self.invalidate_locked();
    }

    /// Invalidate only if the session that issued a rejected request is
    /// still the current one. A 401 for a request sent before a newer login
    /// must not tear down the newer session.
    ///
    /// Returns whether a credential was removed.
    pub fn invalidate_generation(&self, generation: u64) -> bool {
        let _lock = self.lock();
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            tracing::debug!(
                "Ignoring authorization failure from generation {} (current {})",
                generation,
                current
            );
            return false;
        }
        self.invalidate_locked()
    }

    pub fn currently_authenticated(&self) -> bool {
        self.store.is_present()
    }

    pub fn state(&self) -> SessionState {
        if self.currently_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Consistent view of generation and credential for one request
    pub fn snapshot(&self) -> SessionSnapshot {
        let _lock = self.lock();
        SessionSnapshot {
            generation: self.generation.load(Ordering::SeqCst),
            credential: self.store.get(),
        }
    }

    /// Receiver notified on every transition, for views that must react to
    /// an invalidation without a navigation event
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    fn invalidate_locked(&self) -> bool {
        if !self.store.clear() {
            tracing::debug!("Invalidate requested while already anonymous");
            return false;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_replace(SessionState::Anonymous);
        tracing::info!("Session invalidated (generation {})", generation);
        true
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.transition.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
