use crate::db::{KeyValueStore, StoreError};
use crate::http::UserRecord;
use crate::logger::LOGGER;
use serde::{Deserialize, Serialize};

pub const TOKEN_KEY: &str = "oncoderma_token";
pub const USER_KEY: &str = "oncoderma_user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserRecord,
}

/// Persists the signed-in session as two string entries: the token and the
/// JSON user record.
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session saved by a previous run, if both entries are present.
    ///
    /// A user record that no longer parses is treated as a broken session
    /// and wiped.
    pub fn restore(&self) -> Result<Option<Session>, StoreError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            _ => return Ok(None),
        };

        match serde_json::from_str::<UserRecord>(&user) {
            Ok(user) => Ok(Some(Session { token, user })),
            Err(e) => {
                LOGGER.warning(&format!("Discarding unreadable saved session: {}", e));
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &user)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }
}
