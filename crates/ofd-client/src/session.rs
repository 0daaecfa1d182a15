//! # Session
//!
//! Holds the token issued by `POST /api/user/login`.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Session::new()          token = None                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   authenticate() ──ok──►  token = Some("abc")   (overwrites old token)  │
//! │        │                                                                │
//! │        └────err──►        token unchanged, AuthenticationFailed         │
//! │                                                                         │
//! │   token()                 Some(t) ─► Ok(t)                              │
//! │                           None    ─► Err(NotAuthenticated)              │
//! │                                                                         │
//! │   No expiry tracking: re-authenticate when calls start returning 401.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The token lives in the session instance, never in process-wide state, so
//! two clients for two accounts do not interfere. The slot is behind an
//! `RwLock`: readers never see a half-written token.

use ofd_core::wire::{LoginRequest, LoginResponse};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::Credentials;
use crate::error::{OfdError, OfdResult};
use crate::transport::Transport;

pub const LOGIN_PATH: &str = "/api/user/login";

/// Authentication state of one client.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs in and stores the returned token.
    ///
    /// On failure the previously stored token (if any) is kept.
    pub async fn authenticate(
        &self,
        transport: &Transport,
        credentials: &Credentials,
    ) -> OfdResult<()> {
        let request = LoginRequest {
            login: &credentials.login,
            password: &credentials.password,
        };

        let response: LoginResponse = transport
            .post_json(LOGIN_PATH, &request)
            .await
            .map_err(|e| {
                error!(login = %credentials.login, error = %e, "OFD login failed");
                OfdError::AuthenticationFailed(e.to_string())
            })?;

        if response.auth_token.is_empty() {
            error!(login = %credentials.login, "OFD login returned no token");
            return Err(OfdError::AuthenticationFailed(
                "login response carried no authToken".into(),
            ));
        }

        *self.token.write().await = Some(response.auth_token);
        info!(login = %credentials.login, "Authenticated with OFD");
        Ok(())
    }

    /// Current token.
    pub async fn token(&self) -> OfdResult<String> {
        self.token
            .read()
            .await
            .clone()
            .ok_or(OfdError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::MockOfd;

    #[tokio::test]
    async fn test_authenticate_stores_token() {
        let server = MockOfd::builder().login("abc").start().await;
        let config = server.config();
        let transport = Transport::new(&config).unwrap();
        let session = Session::new();

        assert!(matches!(session.token().await, Err(OfdError::NotAuthenticated)));

        session.authenticate(&transport, &config.account).await.unwrap();
        assert_eq!(session.token().await.unwrap(), "abc");

        let login = &server.requests_to(LOGIN_PATH)[0];
        assert_eq!(login.method, "POST");
        let body: serde_json::Value = serde_json::from_str(&login.body).unwrap();
        assert_eq!(body["login"], "user@example.com");
        assert_eq!(body["password"], "secret");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_previous_token() {
        let good = MockOfd::builder().login("first").start().await;
        let bad = MockOfd::builder()
            .post_raw(LOGIN_PATH, 401, r#"{"error":"bad credentials"}"#)
            .start()
            .await;
        let session = Session::new();

        let config = good.config();
        session
            .authenticate(&Transport::new(&config).unwrap(), &config.account)
            .await
            .unwrap();

        let config = bad.config();
        let err = session
            .authenticate(&Transport::new(&config).unwrap(), &config.account)
            .await
            .unwrap_err();

        assert!(matches!(err, OfdError::AuthenticationFailed(_)), "{err:?}");
        assert_eq!(session.token().await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_empty_token_is_failure() {
        let server = MockOfd::builder()
            .post_raw(LOGIN_PATH, 200, r#"{"authToken":""}"#)
            .start()
            .await;
        let config = server.config();
        let session = Session::new();

        let result = session
            .authenticate(&Transport::new(&config).unwrap(), &config.account)
            .await;
        assert!(result.unwrap_err().is_auth_error());
        assert!(matches!(session.token().await, Err(OfdError::NotAuthenticated)));
    }
}
