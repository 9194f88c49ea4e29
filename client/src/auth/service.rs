//! Client-side authentication flow.
//!
//! Wraps the `/auth` endpoints and mirrors the session record into the
//! injected [`SessionStorage`].

use crate::api::ApiClient;
use crate::auth::models::*;
use crate::errors::ClientResult;
use crate::storage::{REFRESH_TOKEN_KEY, SessionStorage, TOKEN_KEY, USER_KEY};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication service for register, login, logout and profile calls
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    storage: Arc<dyn SessionStorage>,
}

impl AuthService {
    /// Create a new AuthService sharing the client's session store
    pub fn new(api: ApiClient) -> Self {
        let storage = Arc::clone(api.storage());
        Self { api, storage }
    }

    /// Register a new account.
    ///
    /// When the response carries a string token the session is saved. The
    /// payload is returned either way, whatever its shape.
    pub async fn register<T>(&self, user_data: &T) -> ClientResult<AuthResponse>
    where
        T: Serialize + ?Sized,
    {
        self.authenticate("/auth/register", user_data).await
    }

    /// Log in with the given credentials.
    ///
    /// When the response carries a string token the session is saved. The
    /// payload is returned either way, whatever its shape.
    pub async fn login<T>(&self, credentials: &T) -> ClientResult<AuthResponse>
    where
        T: Serialize + ?Sized,
    {
        self.authenticate("/auth/login", credentials).await
    }

    /// Log out on the server and clear the local session.
    ///
    /// The session keys are removed on every exit path, including a failed
    /// request. The request error, if any, is returned after cleanup.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.api.post_no_content("/auth/logout").await;
        if let Err(e) = &result {
            warn!("Logout request failed, clearing local session anyway: {}", e);
        }

        self.clear_session().await;
        result
    }

    /// Fetch the authenticated user's profile
    pub async fn get_profile(&self) -> ClientResult<Value> {
        self.api.get("/auth/me").await
    }

    pub async fn update_profile<T>(&self, data: &T) -> ClientResult<Value>
    where
        T: Serialize + ?Sized,
    {
        self.api.put("/auth/profile", data).await
    }

    pub async fn change_password<T>(&self, data: &T) -> ClientResult<Value>
    where
        T: Serialize + ?Sized,
    {
        self.api.put("/auth/change-password", data).await
    }

    /// True iff a token is present in storage.
    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// The stored user, or `None` when absent or unreadable.
    pub async fn get_current_user(&self) -> Option<Value> {
        let raw = self.read(USER_KEY).await?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Null) => None,
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user is not valid JSON: {}", e);
                None
            }
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).await
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY).await
    }

    /// Current session record, if a token is stored
    pub async fn session(&self) -> Option<SessionRecord> {
        let token = self.token().await?;
        Some(SessionRecord {
            token,
            user: self.get_current_user().await,
            refresh_token: self.refresh_token().await,
        })
    }

    async fn authenticate<T>(&self, path: &str, body: &T) -> ClientResult<AuthResponse>
    where
        T: Serialize + ?Sized,
    {
        let payload: Value = self.api.post(path, body).await?;
        let response = AuthResponse::from_payload(payload);
        self.save_session(&response).await?;
        Ok(response)
    }

    /// Mirror token, user and refresh token into storage.
    ///
    /// The three writes are independent; a failure part-way leaves the
    /// earlier keys written.
    async fn save_session(&self, response: &AuthResponse) -> ClientResult<()> {
        let Some(token) = response.token.as_deref() else {
            return Ok(());
        };

        let user = serde_json::to_string(response.user.as_ref().unwrap_or(&Value::Null))?;

        self.storage.set(TOKEN_KEY, token).await?;
        self.storage.set(USER_KEY, &user).await?;
        if let Some(refresh_token) = &response.refresh_token {
            self.storage.set(REFRESH_TOKEN_KEY, refresh_token).await?;
        }

        info!("Session saved");
        Ok(())
    }

    async fn clear_session(&self) {
        for key in [TOKEN_KEY, USER_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                warn!("Failed to remove {} from session store: {}", key, e);
            }
        }
        info!("Session cleared");
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {} from session store: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::ClientError;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(uri: &str) -> (AuthService, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let config = Config {
            api_base_url: uri.to_string(),
            ..Config::default()
        };
        let api = ApiClient::new(&config, storage.clone()).expect("client creation");
        (AuthService::new(api), storage)
    }

    async fn mount_login(server: &MockServer, body: Value) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_saves_session() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, json!({"token": "t1", "user": {"id": 1}})).await;

        let (auth, storage) = service_for(&mock_server.uri());
        let response = auth
            .login(&json!({"email": "user@example.com", "password": "Abcdefg1"}))
            .await
            .unwrap();

        assert_eq!(response.token.as_deref(), Some("t1"));
        assert!(auth.is_authenticated().await);
        assert_eq!(auth.get_current_user().await, Some(json!({"id": 1})));
        assert_eq!(storage.get(REFRESH_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_stores_refresh_token_when_present() {
        let mock_server = MockServer::start().await;
        mount_login(
            &mock_server,
            json!({"token": "t1", "user": {"id": 1}, "refreshToken": "r1"}),
        )
        .await;

        let (auth, _storage) = service_for(&mock_server.uri());
        auth.login(&json!({})).await.unwrap();

        let session = auth.session().await.unwrap();
        assert_eq!(
            session,
            SessionRecord {
                token: "t1".to_string(),
                user: Some(json!({"id": 1})),
                refresh_token: Some("r1".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_login_without_token_returns_payload_and_saves_nothing() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, json!({"message": "Verify your email first"})).await;

        let (auth, _storage) = service_for(&mock_server.uri());
        let response = auth.login(&json!({})).await.unwrap();

        assert!(!response.has_token());
        assert_eq!(response.payload["message"], "Verify your email first");
        assert!(!auth.is_authenticated().await);
        assert!(auth.session().await.is_none());
    }

    #[tokio::test]
    async fn test_login_with_empty_body_saves_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let (auth, _storage) = service_for(&mock_server.uri());
        let response = auth.login(&json!({})).await.unwrap();

        assert_eq!(response.payload, Value::Null);
        assert!(!response.has_token());
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_with_non_string_token_saves_nothing() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, json!({"token": 123, "user": {"id": 1}})).await;

        let (auth, storage) = service_for(&mock_server.uri());
        let response = auth.login(&json!({})).await.unwrap();

        assert!(!response.has_token());
        assert_eq!(response.payload, json!({"token": 123, "user": {"id": 1}}));
        assert!(!auth.is_authenticated().await);
        assert_eq!(storage.get(USER_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_posts_user_data_and_saves_session() {
        let mock_server = MockServer::start().await;
        let user_data = json!({"username": "valid_user-1", "email": "user@example.com"});

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(&user_data))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"token": "t2", "user": {"id": 2}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, storage) = service_for(&mock_server.uri());
        auth.register(&user_data).await.unwrap();

        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("t2"));
        assert_eq!(auth.get_current_user().await, Some(json!({"id": 2})));
    }

    #[tokio::test]
    async fn test_failed_login_propagates_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&mock_server)
            .await;

        let (auth, _storage) = service_for(&mock_server.uri());
        let result = auth.login(&json!({})).await;

        assert!(matches!(result, Err(ClientError::Api { status: 401, .. })));
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let mock_server = MockServer::start().await;
        mount_login(
            &mock_server,
            json!({"token": "t1", "user": {"id": 1}, "refreshToken": "r1"}),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, _storage) = service_for(&mock_server.uri());
        auth.login(&json!({})).await.unwrap();
        assert!(auth.is_authenticated().await);

        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated().await);
        assert!(auth.get_current_user().await.is_none());
        assert!(auth.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_accepts_plain_text_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Logged out"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, storage) = service_for(&mock_server.uri());
        storage.set(TOKEN_KEY, "t1").await.unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).await.unwrap();

        auth.logout().await.unwrap();
        assert!(!auth.is_authenticated().await);
        assert!(auth.get_current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_when_server_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let (auth, storage) = service_for(&mock_server.uri());
        storage.set(TOKEN_KEY, "t1").await.unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).await.unwrap();

        let result = auth.logout().await;
        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        assert!(!auth.is_authenticated().await);
        assert!(auth.get_current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_when_network_fails() {
        let (auth, storage) = service_for("http://127.0.0.1:1");
        storage.set(TOKEN_KEY, "t1").await.unwrap();
        storage.set(USER_KEY, r#"{"id":1}"#).await.unwrap();

        let result = auth.logout().await;
        assert!(matches!(result, Err(ClientError::Network { .. })));
        assert!(!auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_profile_pass_throughs() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/auth/profile"))
            .and(body_json(json!({"bio": "validator"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bio": "validator"})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/auth/change-password"))
            .and(body_json(
                json!({"currentPassword": "Old12345", "newPassword": "New12345"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, _storage) = service_for(&mock_server.uri());

        assert_eq!(auth.get_profile().await.unwrap(), json!({"id": 1}));
        assert_eq!(
            auth.update_profile(&json!({"bio": "validator"})).await.unwrap(),
            json!({"bio": "validator"})
        );
        let request = ChangePasswordRequest {
            current_password: "Old12345".to_string(),
            new_password: "New12345".to_string(),
        };
        assert_eq!(
            auth.change_password(&request).await.unwrap(),
            json!({"updated": true})
        );
    }

    #[tokio::test]
    async fn test_current_user_ignores_malformed_json() {
        let (auth, storage) = service_for("http://127.0.0.1:1");
        storage.set(USER_KEY, "{not json").await.unwrap();
        assert!(auth.get_current_user().await.is_none());

        storage.set(USER_KEY, "null").await.unwrap();
        assert!(auth.get_current_user().await.is_none());
    }
}
