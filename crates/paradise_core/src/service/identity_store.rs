//! Identity store: registration, login and the persisted session marker.
//!
//! # Responsibility
//! - Validate credentials against the persisted identity list.
//! - Own the in-memory session and mirror it to the session marker.
//!
//! # Invariants
//! - No two persisted identities share a `username`.
//! - Login failures never reveal whether the username exists.
//! - The in-memory session only changes after the marker write succeeded.
//! - Log events carry usernames at most; secrets are never logged.

use crate::clock::{Clock, SystemClock};
use crate::model::identity::{Identity, Session};
use crate::storage::{read_json, write_json, KeyValueStore, StorageError, StorageKeys};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug)]
pub enum IdentityError {
    /// No identity matches the given username/password pair.
    InvalidCredentials,
    DuplicateUsername(String),
    Storage(StorageError),
}

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::DuplicateUsername(username) => {
                write!(f, "username already exists: {username}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IdentityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for IdentityError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Owner of the signed-in session.
pub struct IdentityStore<S: KeyValueStore> {
    storage: S,
    keys: StorageKeys,
    clock: Box<dyn Clock>,
    session: Option<Session>,
}

impl<S: KeyValueStore> IdentityStore<S> {
    /// Creates a store with default keys and the system clock.
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, StorageKeys::default(), SystemClock)
    }

    pub fn with_options(storage: S, keys: StorageKeys, clock: impl Clock + 'static) -> Self {
        Self {
            storage,
            keys,
            clock: Box::new(clock),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Appends a new identity and signs it in.
    ///
    /// # Errors
    /// - `DuplicateUsername` when the username is taken; nothing is written.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> IdentityResult<Session> {
        let mut identities = self.load_identities()?;
        if identities.iter().any(|identity| identity.username == username) {
            warn!(
                "event=auth_register module=identity status=error error_code=duplicate_username username={}",
                username
            );
            return Err(IdentityError::DuplicateUsername(username.to_string()));
        }

        let identity = Identity {
            username: username.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            created_at: self.clock.now(),
        };
        let session = identity.session();
        identities.push(identity);
        write_json(&self.storage, &self.keys.identity_list(), &identities)?;

        self.establish(session.clone())?;
        info!(
            "event=auth_register module=identity status=ok username={} identity_count={}",
            username,
            identities.len()
        );
        Ok(session)
    }

    /// Signs in with an exact username/password match.
    ///
    /// # Errors
    /// - `InvalidCredentials` for unknown users and wrong passwords alike.
    pub fn login(&mut self, username: &str, password: &str) -> IdentityResult<Session> {
        let identities = self.load_identities()?;
        let Some(identity) = identities
            .iter()
            .find(|identity| identity.matches(username, password))
        else {
            warn!(
                "event=auth_login module=identity status=error error_code=invalid_credentials"
            );
            return Err(IdentityError::InvalidCredentials);
        };

        let session = identity.session();
        self.establish(session.clone())?;
        info!(
            "event=auth_login module=identity status=ok username={}",
            username
        );
        Ok(session)
    }

    /// Clears the session and its marker. Safe to call while signed out.
    ///
    /// The in-memory session is cleared even when removing the marker fails.
    pub fn logout(&mut self) -> IdentityResult<()> {
        let previous = self.session.take();
        self.storage.remove(&self.keys.current_session())?;
        if let Some(session) = previous {
            info!(
                "event=auth_logout module=identity status=ok username={}",
                session.username
            );
        }
        Ok(())
    }

    /// Loads a persisted session marker without re-validating it.
    pub fn restore_session(&mut self) -> IdentityResult<Option<Session>> {
        let restored: Option<Session> = read_json(&self.storage, &self.keys.current_session())?;
        match &restored {
            Some(session) => info!(
                "event=session_restore module=identity status=ok username={}",
                session.username
            ),
            None => info!("event=session_restore module=identity status=ok restored=false"),
        }
        self.session = restored.clone();
        Ok(restored)
    }

    fn load_identities(&self) -> IdentityResult<Vec<Identity>> {
        let identities = read_json(&self.storage, &self.keys.identity_list())?;
        Ok(identities.unwrap_or_default())
    }

    fn establish(&mut self, session: Session) -> IdentityResult<()> {
        write_json(&self.storage, &self.keys.current_session(), &session)?;
        self.session = Some(session);
        Ok(())
    }
}
