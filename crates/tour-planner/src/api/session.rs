// Session presence.
//
// The account service is only consulted to learn whether a session cookie
// is already valid (on startup) and to end it (on logout). The planning
// flow never depends on it; the UI just shows who is signed in.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{append_path, Config};

const AUTH_CHECK_PATH: &str = "/api/v1/auth/authCheck";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";
const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// The signed-in account as reported by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct AuthCheckResponse {
    user: SessionUser,
}

/// A session check running in the background. Resolves to the signed-in
/// user, or `None` when there is no valid session.
pub type SessionCheck = JoinHandle<Option<SessionUser>>;

/// Client for the account service that remembers the current session.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
    user: Option<SessionUser>,
}

impl AuthClient {
    /// Build a client with its own cookie jar, so the session cookie set by
    /// the account service is sent back on later calls.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(AUTH_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            user: None,
        })
    }

    fn url(&self, path: &str) -> Url {
        append_path(&self.base_url, path)
    }

    /// Owns its client handle so it can run as a detached task. Clones of
    /// a `reqwest::Client` share the cookie jar.
    async fn check(http: reqwest::Client, url: Url) -> Option<SessionUser> {
        let response = match http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Session check failed: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "no active session");
            return None;
        }
        match response.json::<AuthCheckResponse>().await {
            Ok(body) => Some(body.user),
            Err(e) => {
                warn!("Unreadable session check response: {e}");
                None
            }
        }
    }

    /// Returns true only when the account service confirmed the logout.
    async fn logout(&self) -> bool {
        match self.http.post(self.url(LOGOUT_PATH)).send().await {
            Ok(r) if r.status().is_success() => {
                info!("Logged out");
                true
            }
            Ok(r) => {
                warn!("Logout returned status {}", r.status());
                false
            }
            Err(e) => {
                warn!("Logout request failed: {e}");
                false
            }
        }
    }
}

/// Process-wide session state: present or not.
///
/// The startup check runs in the background (`spawn_check`, then
/// `apply_check` with its result); `teardown` runs on logout. Everything
/// else only asks [`SessionStore::is_present`].
pub enum SessionStore {
    /// Account service configured.
    Active(AuthClient),
    /// No `[auth]` section; there is never a session.
    Disabled,
}

impl SessionStore {
    pub fn from_config(config: &Config) -> Self {
        let Some(auth) = &config.auth else {
            return SessionStore::Disabled;
        };
        match AuthClient::new(auth.base_url.clone()) {
            Ok(client) => SessionStore::Active(client),
            Err(e) => {
                warn!("Failed to build auth client, sessions disabled: {e}");
                SessionStore::Disabled
            }
        }
    }

    /// Start asking the account service whether the current cookie is a
    /// valid session. `None` when sessions are disabled.
    pub fn spawn_check(&self) -> Option<SessionCheck> {
        match self {
            SessionStore::Active(client) => {
                let http = client.http.clone();
                let url = client.url(AUTH_CHECK_PATH);
                Some(tokio::spawn(AuthClient::check(http, url)))
            }
            SessionStore::Disabled => None,
        }
    }

    /// Record the outcome of a session check. Returns whether a session is
    /// now present.
    pub fn apply_check(&mut self, user: Option<SessionUser>) -> bool {
        let SessionStore::Active(client) = self else {
            return false;
        };
        match &user {
            Some(user) => info!("Session present for {}", user.username),
            None => info!("No session present"),
        }
        client.user = user;
        client.user.is_some()
    }

    /// End the session. The local user is only dropped once the account
    /// service confirms; after a failed call the server session and its
    /// cookie are still live. Returns true when no session remains.
    pub async fn teardown(&mut self) -> bool {
        if let SessionStore::Active(client) = self {
            if client.user.is_some() && client.logout().await {
                client.user = None;
            }
        }
        !self.is_present()
    }

    pub fn is_present(&self) -> bool {
        self.user().is_some()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionStore::Active(client) => client.user.as_ref(),
            SessionStore::Disabled => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{refused_url, serve_once};

    /// Run the startup check to completion, the way the app loop does.
    async fn run_check(store: &mut SessionStore) -> bool {
        let user = match store.spawn_check() {
            Some(check) => check.await.unwrap(),
            None => None,
        };
        store.apply_check(user)
    }

    fn signed_in(base: Url) -> SessionStore {
        let mut client = AuthClient::new(base).unwrap();
        client.user = Some(SessionUser {
            id: "u1".into(),
            username: "asha".into(),
            email: String::new(),
        });
        SessionStore::Active(client)
    }

    #[tokio::test]
    async fn disabled_store_never_has_session() {
        let mut store = SessionStore::Disabled;
        assert!(store.spawn_check().is_none());
        assert!(!run_check(&mut store).await);
        assert!(!store.is_present());
        assert!(store.teardown().await);
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn check_reads_user_from_auth_check() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"user":{"_id":"u1","username":"asha","email":"asha@example.com"}}"#,
        )
        .await;
        let mut store = SessionStore::Active(AuthClient::new(Url::parse(&base).unwrap()).unwrap());

        assert!(run_check(&mut store).await);
        let user = store.user().expect("user present");
        assert_eq!(user.id, "u1");
        assert_eq!(user.username, "asha");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/v1/auth/authCheck "));
    }

    #[tokio::test]
    async fn check_keeps_base_path() {
        let (base, server) = serve_once("401 Unauthorized", "{}").await;
        let base = Url::parse(&format!("{base}/accounts")).unwrap();
        let mut store = SessionStore::Active(AuthClient::new(base).unwrap());

        assert!(!run_check(&mut store).await);
        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /accounts/api/v1/auth/authCheck "));
    }

    #[tokio::test]
    async fn unauthorized_check_means_no_session() {
        let (base, _server) = serve_once("401 Unauthorized", r#"{"message":"Unauthorized"}"#).await;
        let mut store = SessionStore::Active(AuthClient::new(Url::parse(&base).unwrap()).unwrap());
        assert!(!run_check(&mut store).await);
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn unreachable_service_means_no_session() {
        let mut store = SessionStore::Active(AuthClient::new(refused_url().await).unwrap());
        assert!(!run_check(&mut store).await);
    }

    #[tokio::test]
    async fn unreachable_logout_keeps_session() {
        let mut store = signed_in(refused_url().await);
        assert!(store.is_present());

        assert!(!store.teardown().await);
        assert_eq!(store.user().map(|u| u.username.as_str()), Some("asha"));
    }

    #[tokio::test]
    async fn rejected_logout_keeps_session() {
        let (base, server) = serve_once("500 Internal Server Error", r#"{"message":"boom"}"#).await;
        let mut store = signed_in(Url::parse(&base).unwrap());

        assert!(!store.teardown().await);
        assert!(store.is_present());
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/auth/logout "));
    }

    #[tokio::test]
    async fn confirmed_logout_clears_session() {
        let (base, server) = serve_once("200 OK", r#"{"message":"Logged out"}"#).await;
        let mut store = signed_in(Url::parse(&base).unwrap());

        assert!(store.teardown().await);
        assert!(!store.is_present());
        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/auth/logout "));
    }
}
