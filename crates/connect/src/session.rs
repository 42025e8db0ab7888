//! Session layer: token persistence and the access-gating decision.

use std::sync::Arc;

use log::debug;

use avisos_core::access::{AccessState, AccessWindow};
use avisos_core::secrets::SecretStore;

use crate::client::ConnectClient;
use crate::error::{ApiRetryClass, ConnectError, Result};
use crate::types::AuthUser;

/// Key under which the bearer token is persisted in the secret store.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Owns the persisted token and drives the client on behalf of the UI shell.
pub struct ConnectSession {
    client: ConnectClient,
    secrets: Arc<dyn SecretStore>,
}

impl ConnectSession {
    pub fn new(client: ConnectClient, secrets: Arc<dyn SecretStore>) -> Self {
        Self { client, secrets }
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.secrets.get_secret(AUTH_TOKEN_KEY)?)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    async fn store_token(&self, token: &str) -> Result<()> {
        self.secrets.set_secret(AUTH_TOKEN_KEY, token).await?;
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self.client.register(email, password).await?;
        self.store_token(&response.token).await?;
        Ok(response.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser> {
        let response = self.client.login(email, password).await?;
        self.store_token(&response.token).await?;
        Ok(response.user)
    }

    pub async fn verify_email(&self, verification_token: &str) -> Result<AuthUser> {
        let response = self.client.verify_email(verification_token).await?;
        self.store_token(&response.token).await?;
        Ok(response.user)
    }

    /// The authenticated user, or `None` when logged out. A rejected token
    /// invalidates the session.
    pub async fn current_user(&self) -> Result<Option<AuthUser>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };

        match self.client.me(&token).await {
            Ok(user) => Ok(Some(user)),
            Err(ConnectError::Api { status, .. }) => {
                debug!("session token rejected with status {status}; logging out");
                self.logout().await?;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Gating decision for the application shell. An API-level failure to
    /// read the access window degrades to blocked rather than erroring.
    pub async fn check_access(&self) -> Result<AccessState> {
        let Some(token) = self.token()? else {
            return Ok(AccessState::LoggedOut);
        };

        match self.client.access(&token).await {
            Ok(body) => {
                let window = AccessWindow::from(body);
                if window.has_access {
                    Ok(AccessState::Allowed {
                        access_until: window.access_until,
                    })
                } else {
                    Ok(AccessState::Blocked {
                        access_until: window.access_until,
                    })
                }
            }
            Err(err) if err.retry_class() != ApiRetryClass::Retryable => {
                debug!("access check failed permanently: {err}");
                Ok(AccessState::Blocked { access_until: None })
            }
            Err(err) => Err(err),
        }
    }

    /// Discards the persisted token. Nothing is sent to the server.
    pub async fn logout(&self) -> Result<()> {
        self.secrets.delete_secret(AUTH_TOKEN_KEY).await?;
        Ok(())
    }
}
