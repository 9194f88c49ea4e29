//! HTTP transport shared by the auth and ledger services.
//!
//! Joins endpoint paths onto the configured base URL, attaches the stored
//! bearer token, and turns responses into [`ClientResult`] values.

use crate::api::common::{decode_body, error_message};
use crate::config::Config;
use crate::errors::{ClientError, ClientResult};
use crate::storage::{SessionStorage, TOKEN_KEY};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client bound to one API base URL and one session store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    /// Creates a new API client.
    ///
    /// # Arguments
    /// * `config` - Supplies the base URL and request timeout
    /// * `storage` - Session store the bearer token is read from
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed
    pub fn new(config: &Config, storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store shared with the services built on this client.
    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    pub async fn get<Res>(&self, path: &str) -> ClientResult<Res>
    where
        Res: DeserializeOwned,
    {
        self.request::<(), Res>(Method::GET, path, None).await
    }

    pub async fn post<Req, Res>(&self, path: &str, body: &Req) -> ClientResult<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST without a request body, checking only the response status.
    ///
    /// Any success body is ignored, JSON or not.
    pub async fn post_no_content(&self, path: &str) -> ClientResult<()> {
        let response = self.send::<()>(Method::POST, path, None).await?;
        check_status(response).await.map(|_| ())
    }

    pub async fn put<Req, Res>(&self, path: &str, body: &Req) -> ClientResult<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn request<Req, Res>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Req>,
    ) -> ClientResult<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self.send(method, path, body).await?;
        let text = check_status(response).await?;
        decode_body(&text)
    }

    async fn send<Req>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Req>,
    ) -> ClientResult<Response>
    where
        Req: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending API request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let request = self.authorize(request).await;
        Ok(request.send().await?)
    }

    /// Attaches the stored token as a bearer credential, if there is one.
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.get(TOKEN_KEY).await {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!("Sending request without credentials: {}", e);
                request
            }
        }
    }
}

/// Reads the body, turning a non-success status into [`ClientError::Api`].
async fn check_status(response: Response) -> ClientResult<String> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = error_message(status, &text);
        debug!(status = status.as_u16(), %message, "API request failed");
        return Err(ClientError::api(status.as_u16(), message));
    }

    Ok(text)
}
