//! Session state holder
//!
//! [`Session`] is the single source of truth for who is logged in. It is
//! restored from the persistence collaborator once at start-up and mutated
//! only by login, logout and profile update. Every mutation writes through
//! to the store before the in-memory state changes, and the user and token
//! keys are always written in one batch.

use crate::error::{SessionError, StoreError};
use crate::store::{Change, KeyValueStore, TOKEN_KEY, USER_KEY};
use clinic_client::UserApi;
use clinic_core::{Credentials, User, UserId, UserUpdate};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Marks a profile update as in flight until dropped
struct UpdateGuard<'a>(&'a AtomicBool);

impl<'a> UpdateGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Current authenticated user, shared by every screen
pub struct Session {
    users: Arc<dyn UserApi>,
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<User>>,
    token: RwLock<Option<String>>,
    loading: AtomicBool,
    updating: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("current", &*self.current.read())
            .field("has_token", &self.token.read().is_some())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Empty session; call [`Session::initialize`] before reading it
    #[must_use]
    pub fn new(users: Arc<dyn UserApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            users,
            store,
            current: RwLock::new(None),
            token: RwLock::new(None),
            loading: AtomicBool::new(true),
            updating: AtomicBool::new(false),
        }
    }

    /// Restore the persisted user, if any
    ///
    /// A record that no longer decodes, or a store whose contents are
    /// corrupt, counts as no session. Loading ends even when the store
    /// cannot be read.
    ///
    /// # Errors
    /// The store cannot be read.
    pub fn initialize(&self) -> Result<Option<User>, SessionError> {
        let restored = self.restore();
        self.loading.store(false, Ordering::Release);
        let (user, token) = restored?;

        if let Some(user) = &user {
            tracing::debug!("Restored session for {}", user.username);
        }
        *self.current.write() = user.clone();
        *self.token.write() = token;
        Ok(user)
    }

    fn restore(&self) -> Result<(Option<User>, Option<String>), SessionError> {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok((None, None)),
            Err(e @ StoreError::Corrupt { .. }) => {
                tracing::warn!("Starting logged out: {}", e);
                return Ok((None, None));
            }
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok((Some(user), self.store.get(TOKEN_KEY)?)),
            Err(e) => {
                tracing::warn!("Ignoring corrupt persisted session: {}", e);
                Ok((None, None))
            }
        }
    }

    /// Authenticate and become the backend's user
    ///
    /// # Errors
    /// The backend rejects the credentials or the store write fails; the
    /// previous session is kept either way.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, SessionError> {
        let response = self.users.login(credentials).await?;
        let encoded = serde_json::to_string(&response.user)?;

        let token = match &response.token {
            Some(token) => Change::set(TOKEN_KEY, token.as_str()),
            None => Change::remove(TOKEN_KEY),
        };
        self.store.write_all(&[Change::set(USER_KEY, encoded), token])?;

        tracing::info!("Logged in as {}", response.user.username);
        *self.current.write() = Some(response.user.clone());
        *self.token.write() = response.token;
        Ok(response.user)
    }

    /// Forget the current user locally; the backend is not contacted
    ///
    /// # Errors
    /// The persisted keys cannot be removed.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.store
            .write_all(&[Change::remove(USER_KEY), Change::remove(TOKEN_KEY)])?;

        if let Some(user) = self.current.write().take() {
            tracing::info!("Logged out {}", user.username);
        }
        *self.token.write() = None;
        Ok(())
    }

    /// Send a partial profile update and adopt the backend's record
    ///
    /// The patch is never merged locally. Only one update may be in flight.
    ///
    /// # Errors
    /// [`SessionError::UpdateInFlight`] while another update is pending;
    /// otherwise a backend or store failure, with prior state untouched.
    pub async fn update_profile(
        &self,
        id: UserId,
        patch: &UserUpdate,
    ) -> Result<User, SessionError> {
        let _guard = UpdateGuard::acquire(&self.updating).ok_or(SessionError::UpdateInFlight)?;

        let user = self.users.update_user(id, patch).await?;
        let encoded = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, &encoded)?;

        tracing::info!("Profile updated for {}", user.username);
        *self.current.write() = Some(user.clone());
        Ok(user)
    }

    /// Copy of the current user
    #[inline]
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    #[inline]
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Bearer token issued at login, if any
    #[inline]
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// True until [`Session::initialize`] has run
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether a profile update is pending
    #[inline]
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }
}
