use super::{Session, SessionStore};
use crate::db::{KeyValueStore, StoreError};
use crate::http::{AccountTransport, ContactMessage, LoginRequest, TransportError};
use crate::logger::LOGGER;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials(String),
    NotSignedIn,
    Rejected(String),
    Transport(TransportError),
    Store(StoreError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Usuario y contraseña son requeridos"),
            AuthError::InvalidCredentials(message) => write!(f, "{}", message),
            AuthError::NotSignedIn => write!(f, "No hay una sesión activa"),
            AuthError::Rejected(message) => write!(f, "{}", message),
            AuthError::Transport(e) => write!(f, "Error de conexión con el servidor: {}", e),
            AuthError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<TransportError> for AuthError {
    fn from(e: TransportError) -> Self {
        AuthError::Transport(e)
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::Store(e)
    }
}

/// Sign-in state: the current session plus where it is persisted.
pub struct AuthService<T, S> {
    transport: T,
    sessions: SessionStore<S>,
    current: Option<Session>,
}

impl<T: AccountTransport, S: KeyValueStore> AuthService<T, S> {
    /// Builds the service and restores any session saved by a previous run.
    pub fn start(transport: T, sessions: SessionStore<S>) -> Result<Self, AuthError> {
        let current = sessions.restore()?;
        if let Some(session) = &current {
            LOGGER.auth(&format!("Restored session for {}", session.user.username));
        }
        Ok(Self {
            transport,
            sessions,
            current,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let response = self
            .transport
            .login(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let session = match (response.success, response.token, response.user) {
            (true, Some(token), Some(user)) => Session { token, user },
            _ => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Credenciales inválidas".to_string());
                LOGGER.auth(&format!("Login rejected for {}", username));
                return Err(AuthError::InvalidCredentials(message));
            }
        };

        self.sessions.save(&session)?;
        LOGGER.auth(&format!("Signed in as {}", session.user.username));
        Ok(self.current.insert(session))
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.current = None;
        self.sessions.clear()?;
        LOGGER.auth("Signed out");
        Ok(())
    }

    /// Sends a contact form message as the signed-in user.
    pub async fn send_contact(&self, message: &ContactMessage) -> Result<String, AuthError> {
        let token = self.token().ok_or(AuthError::NotSignedIn)?;
        let response = self.transport.send_contact(message, token).await?;
        if response.success {
            Ok(response
                .message
                .unwrap_or_else(|| "Mensaje enviado correctamente".to_string()))
        } else {
            Err(AuthError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Error al enviar el mensaje".to_string()),
            ))
        }
    }
}
